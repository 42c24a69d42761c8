use crate::foundation::error::{ChartError, ChartResult};

/// Identifier of a canvas record, assigned by the metadata store.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CanvasId(pub i64);

impl std::fmt::Display for CanvasId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a fragment record, assigned by the metadata store.
///
/// The same id keys the fragment's pixel blob.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FragmentId(pub i64);

impl std::fmt::Display for FragmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer pixel rectangle with origin `(x, y)` and a positive extent.
///
/// The origin may be negative or lie outside any canvas; [`Rect::new`] only requires a non-empty
/// extent whose far edges fit in `i64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels, always `> 0`.
    pub width: u32,
    /// Height in pixels, always `> 0`.
    pub height: u32,
}

impl Rect {
    /// Create a validated rectangle with a non-empty extent.
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> ChartResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChartError::invalid_geometry(format!(
                "rectangle extent must be positive, got {width}x{height}"
            )));
        }
        if x.checked_add(i64::from(width)).is_none() || y.checked_add(i64::from(height)).is_none()
        {
            return Err(ChartError::invalid_geometry(format!(
                "rectangle ({x}, {y}, {width}x{height}) extends past the coordinate range"
            )));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Exclusive right edge (`x + width`), saturating at `i64::MAX`.
    pub fn right(self) -> i64 {
        self.x.saturating_add(i64::from(self.width))
    }

    /// Exclusive bottom edge (`y + height`), saturating at `i64::MAX`.
    pub fn bottom(self) -> i64 {
        self.y.saturating_add(i64::from(self.height))
    }

    /// Number of pixels covered.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// See [`intersects`].
    pub fn intersects(self, other: Rect) -> bool {
        intersects(self, other)
    }

    /// See [`contains`]. `self` is the outer rectangle.
    pub fn contains(self, inner: Rect) -> bool {
        contains(self, inner)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Return `true` when `a` and `b` overlap or share an edge.
///
/// Edge-touching rectangles (zero-area overlap) count as intersecting.
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.right() >= b.x && b.right() >= a.x && a.bottom() >= b.y && b.bottom() >= a.y
}

/// Return `true` when `inner` lies entirely within `outer`. Non-strict, so every rectangle
/// contains itself.
pub fn contains(outer: Rect, inner: Rect) -> bool {
    inner.x >= outer.x
        && inner.right() <= outer.right()
        && inner.y >= outer.y
        && inner.bottom() <= outer.bottom()
}

/// Opaque RGB8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Black, the default background for uncovered pixels.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as a `[r, g, b]` array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> ChartResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ChartError::serde(format!("invalid color '{s}', expected #rrggbb")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| ChartError::serde(format!("invalid color '{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
