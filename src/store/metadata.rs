use std::collections::BTreeMap;

use crate::{
    canvas::model::{Canvas, Fragment, NewFragment},
    foundation::{
        core::{CanvasId, FragmentId},
        error::{ChartError, ChartResult},
    },
};

/// Persistence of canvas and fragment records.
///
/// Implementations assign ids and a strictly increasing fragment `seq`, and must give the caller
/// read-your-writes consistency: a fragment is visible to `list_fragments` as soon as
/// `insert_fragment` returns.
pub trait MetadataStore {
    /// Create a canvas record.
    fn insert_canvas(&mut self, width: u32, height: u32) -> ChartResult<Canvas>;

    /// Look up a canvas. [`ChartError::NotFound`] when absent.
    fn get_canvas(&self, id: CanvasId) -> ChartResult<Canvas>;

    /// Delete a canvas and every fragment record it owns.
    fn delete_canvas(&mut self, id: CanvasId) -> ChartResult<()>;

    /// Create a fragment record for an existing canvas.
    fn insert_fragment(&mut self, fragment: NewFragment) -> ChartResult<Fragment>;

    /// Look up a fragment. [`ChartError::NotFound`] when absent.
    fn get_fragment(&self, id: FragmentId) -> ChartResult<Fragment>;

    /// All fragments of `canvas`, oldest first.
    fn list_fragments(&self, canvas: CanvasId) -> ChartResult<Vec<Fragment>>;

    /// Delete a fragment record. [`ChartError::NotFound`] when absent.
    fn delete_fragment(&mut self, id: FragmentId) -> ChartResult<()>;
}

/// Current wall-clock time in unix milliseconds.
pub(crate) fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}

/// Metadata store backed by ordered maps; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    canvases: BTreeMap<CanvasId, Canvas>,
    fragments: BTreeMap<FragmentId, Fragment>,
    last_canvas_id: i64,
    last_fragment_id: i64,
    last_seq: u64,
}

impl InMemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn insert_canvas(&mut self, width: u32, height: u32) -> ChartResult<Canvas> {
        self.last_canvas_id += 1;
        let canvas = Canvas {
            id: CanvasId(self.last_canvas_id),
            width,
            height,
        };
        self.canvases.insert(canvas.id, canvas);
        Ok(canvas)
    }

    fn get_canvas(&self, id: CanvasId) -> ChartResult<Canvas> {
        self.canvases
            .get(&id)
            .copied()
            .ok_or_else(|| ChartError::not_found(format!("canvas {id}")))
    }

    fn delete_canvas(&mut self, id: CanvasId) -> ChartResult<()> {
        if self.canvases.remove(&id).is_none() {
            return Err(ChartError::not_found(format!("canvas {id}")));
        }
        self.fragments.retain(|_, f| f.canvas_id != id);
        Ok(())
    }

    fn insert_fragment(&mut self, fragment: NewFragment) -> ChartResult<Fragment> {
        self.get_canvas(fragment.canvas_id)?;
        self.last_fragment_id += 1;
        self.last_seq += 1;
        let record = Fragment {
            id: FragmentId(self.last_fragment_id),
            canvas_id: fragment.canvas_id,
            rect: fragment.rect,
            seq: self.last_seq,
            inserted_at_ms: now_ms(),
        };
        self.fragments.insert(record.id, record);
        Ok(record)
    }

    fn get_fragment(&self, id: FragmentId) -> ChartResult<Fragment> {
        self.fragments
            .get(&id)
            .copied()
            .ok_or_else(|| ChartError::not_found(format!("fragment {id}")))
    }

    fn list_fragments(&self, canvas: CanvasId) -> ChartResult<Vec<Fragment>> {
        let mut out: Vec<Fragment> = self
            .fragments
            .values()
            .filter(|f| f.canvas_id == canvas)
            .copied()
            .collect();
        out.sort_by_key(|f| f.seq);
        Ok(out)
    }

    fn delete_fragment(&mut self, id: FragmentId) -> ChartResult<()> {
        self.fragments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| ChartError::not_found(format!("fragment {id}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/metadata.rs"]
mod tests;
