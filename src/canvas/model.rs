use crate::foundation::core::{CanvasId, FragmentId, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A large logical image of fixed size, composed of fragments.
pub struct Canvas {
    /// Store-assigned identifier.
    pub id: CanvasId,
    /// Width in pixels, immutable after creation.
    pub width: u32,
    /// Height in pixels, immutable after creation.
    pub height: u32,
}

impl Canvas {
    /// The canvas extent as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A positioned rectangular pixel patch belonging to one canvas.
///
/// Pixels live in the blob store under [`Fragment::id`]; this record only references them.
pub struct Fragment {
    /// Store-assigned identifier, also the blob key.
    pub id: FragmentId,
    /// Owning canvas.
    pub canvas_id: CanvasId,
    /// Placement relative to the canvas top-left. May extend past the canvas.
    pub rect: Rect,
    /// Strictly increasing insertion order key. Later fragments paint over earlier ones.
    pub seq: u64,
    /// Wall-clock insertion time in unix milliseconds, for display only.
    pub inserted_at_ms: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Fragment placement submitted to [`crate::MetadataStore::insert_fragment`].
pub struct NewFragment {
    /// Owning canvas.
    pub canvas_id: CanvasId,
    /// Placement relative to the canvas top-left.
    pub rect: Rect,
}
