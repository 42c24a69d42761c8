use crate::{
    canvas::{
        model::{Canvas, Fragment, NewFragment},
        overlap::prune_contained,
    },
    foundation::{
        core::{CanvasId, Rect, Rgb8},
        error::{ChartError, ChartResult},
    },
    render::{compositor, raster::RgbRaster},
    service::{config::ChartographerConfig, limits::Limits},
    store::{
        blob::{BlobStore, FsBlobStore},
        metadata::MetadataStore,
        sqlite::SqliteMetadataStore,
    },
};

/// Canvas service: validates requests and drives the insert, render and delete pipelines over a
/// metadata store and a blob store.
///
/// The service holds no pixel or fragment state of its own; everything is read from the stores on
/// each call.
pub struct Chartographer<M, B> {
    metadata: M,
    blobs: B,
    limits: Limits,
    background: Rgb8,
}

impl Chartographer<SqliteMetadataStore, FsBlobStore> {
    /// Open the durable stores under `config.data_dir`.
    pub fn open(config: &ChartographerConfig) -> ChartResult<Self> {
        let metadata = SqliteMetadataStore::open(config.database_dir())?;
        let blobs = FsBlobStore::open(config.fragments_dir())?;
        Ok(Self::new(metadata, blobs)
            .with_limits(config.limits)
            .with_background(config.background))
    }
}

impl<M: MetadataStore, B: BlobStore> Chartographer<M, B> {
    /// Build a service with default limits and a black background.
    pub fn new(metadata: M, blobs: B) -> Self {
        Self {
            metadata,
            blobs,
            limits: Limits::default(),
            background: Rgb8::BLACK,
        }
    }

    /// Replace the request limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the fill color for uncovered pixels.
    pub fn with_background(mut self, background: Rgb8) -> Self {
        self.background = background;
        self
    }

    /// Borrow the metadata store.
    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    /// Borrow the blob store.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Create an empty canvas.
    #[tracing::instrument(skip(self))]
    pub fn create_canvas(&mut self, width: u32, height: u32) -> ChartResult<Canvas> {
        self.limits.check_canvas(width, height)?;
        let canvas = self.metadata.insert_canvas(width, height)?;
        tracing::info!(canvas = %canvas.id, "created canvas");
        Ok(canvas)
    }

    /// Look up a canvas.
    pub fn canvas(&self, id: CanvasId) -> ChartResult<Canvas> {
        self.metadata.get_canvas(id)
    }

    /// Fragments of a canvas, oldest first.
    pub fn fragments(&self, id: CanvasId) -> ChartResult<Vec<Fragment>> {
        self.metadata.get_canvas(id)?;
        self.metadata.list_fragments(id)
    }

    /// Validate and store a fragment upload.
    ///
    /// `rect` is the declared placement; `pixels` must have exactly its size.
    #[tracing::instrument(skip(self, pixels))]
    pub fn restore_fragment(
        &mut self,
        canvas_id: CanvasId,
        rect: Rect,
        pixels: &RgbRaster,
    ) -> ChartResult<Fragment> {
        let canvas = self.metadata.get_canvas(canvas_id)?;
        self.limits.check_fragment(&canvas, rect)?;
        self.insert_fragment(&canvas, rect, pixels)
    }

    /// Insert pipeline without request limits: store the record, then the blob, then prune every
    /// older fragment the new one fully covers.
    ///
    /// If the blob cannot be written the record is rolled back, so a record never references a
    /// missing blob. Pruned fragments lose their record before their blob, so an interrupted prune
    /// leaves at most an orphaned blob.
    pub fn insert_fragment(
        &mut self,
        canvas: &Canvas,
        rect: Rect,
        pixels: &RgbRaster,
    ) -> ChartResult<Fragment> {
        if pixels.width != rect.width || pixels.height != rect.height {
            return Err(ChartError::invalid_geometry(format!(
                "fragment declared as {}x{} but image is {}x{}",
                rect.width, rect.height, pixels.width, pixels.height
            )));
        }

        let fragment = self.metadata.insert_fragment(NewFragment {
            canvas_id: canvas.id,
            rect,
        })?;

        if let Err(err) = self.blobs.write(fragment.id, pixels) {
            tracing::warn!(fragment = %fragment.id, error = %err, "blob write failed, rolling back");
            if let Err(rollback) = self.metadata.delete_fragment(fragment.id) {
                tracing::error!(fragment = %fragment.id, error = %rollback, "rollback failed");
                return Err(ChartError::storage(anyhow::anyhow!(
                    "blob write for fragment {} failed ({err}) and its record could not be removed ({rollback})",
                    fragment.id
                )));
            }
            return Err(err);
        }
        tracing::info!(fragment = %fragment.id, rect = %rect, "stored fragment");

        self.prune_under(&fragment);
        Ok(fragment)
    }

    /// Remove every older fragment that `fragment` fully covers.
    ///
    /// Runs after `fragment` is durable, so failures only cost storage: they are logged and never
    /// reported as a failed insert. A record that is already gone was pruned by someone else.
    fn prune_under(&mut self, fragment: &Fragment) {
        let fragments = match self.metadata.list_fragments(fragment.canvas_id) {
            Ok(fragments) => fragments,
            Err(err) => {
                tracing::warn!(fragment = %fragment.id, error = %err, "skipping prune, listing failed");
                return;
            }
        };

        for pruned in prune_contained(&fragments, fragment) {
            match self.metadata.delete_fragment(pruned.id) {
                Ok(()) => {}
                Err(err) if err.is_not_found() => {
                    tracing::debug!(pruned = %pruned.id, "record already pruned");
                }
                Err(err) => {
                    tracing::warn!(pruned = %pruned.id, error = %err, "failed to delete pruned record");
                    continue;
                }
            }
            if let Err(err) = self.blobs.delete(pruned.id) {
                tracing::warn!(pruned = %pruned.id, error = %err, "failed to delete pruned blob");
                continue;
            }
            tracing::info!(pruned = %pruned.id, by = %fragment.id, "removed occluded fragment");
        }
    }

    /// Render a region of a canvas. Parts outside the canvas are filled with the background.
    #[tracing::instrument(skip(self))]
    pub fn render_region(&self, canvas_id: CanvasId, region: Rect) -> ChartResult<RgbRaster> {
        let canvas = self.metadata.get_canvas(canvas_id)?;
        self.limits.check_region(&canvas, region)?;
        let fragments = self.metadata.list_fragments(canvas.id)?;
        compositor::render(&canvas, &fragments, region, self.background, &self.blobs)
    }

    /// Delete a canvas with all of its fragments and their blobs.
    #[tracing::instrument(skip(self))]
    pub fn delete_canvas(&mut self, id: CanvasId) -> ChartResult<()> {
        self.metadata.get_canvas(id)?;
        let fragments = self.metadata.list_fragments(id)?;
        self.metadata.delete_canvas(id)?;
        for fragment in &fragments {
            self.blobs.delete(fragment.id)?;
        }
        tracing::info!(canvas = %id, fragments = fragments.len(), "deleted canvas");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/chartographer.rs"]
mod tests;
