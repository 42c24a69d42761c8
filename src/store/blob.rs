use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        RwLock,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::Context;

use crate::{
    foundation::{
        core::FragmentId,
        error::{ChartError, ChartResult},
    },
    render::raster::RgbRaster,
};

/// Key-addressed storage of fragment pixel buffers.
///
/// Blobs are write-once per id: a blob is written when its fragment is inserted and only ever
/// deleted afterwards, never rewritten in place.
pub trait BlobStore {
    /// Persist the pixels of fragment `id`.
    fn write(&self, id: FragmentId, pixels: &RgbRaster) -> ChartResult<()>;

    /// Load the pixels of fragment `id`. A missing blob is a [`ChartError::Storage`].
    fn read(&self, id: FragmentId) -> ChartResult<RgbRaster>;

    /// Remove the pixels of fragment `id`. Removing an absent blob succeeds.
    fn delete(&self, id: FragmentId) -> ChartResult<()>;
}

/// Blob store keeping one uncompressed BMP per fragment at `<root>/<id>.bmp`.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Use `root` as the blob directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> ChartResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create blob dir '{}'", root.display()))
            .map_err(ChartError::storage)?;
        tracing::info!(root = %root.display(), "fragment blob store ready");
        Ok(Self { root })
    }

    /// Directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of the blob for `id`. The file may not exist.
    pub fn path_for(&self, id: FragmentId) -> PathBuf {
        self.root.join(format!("{id}.bmp"))
    }
}

impl BlobStore for FsBlobStore {
    fn write(&self, id: FragmentId, pixels: &RgbRaster) -> ChartResult<()> {
        let bytes = pixels.encode_bmp()?;
        let path = self.path_for(id);
        let tmp = self.root.join(format!("{id}.bmp.tmp"));
        std::fs::write(&tmp, &bytes)
            .with_context(|| format!("write blob '{}'", tmp.display()))
            .map_err(ChartError::storage)?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("move blob into place at '{}'", path.display()))
            .map_err(ChartError::storage)?;
        Ok(())
    }

    fn read(&self, id: FragmentId) -> ChartResult<RgbRaster> {
        let path = self.path_for(id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ChartError::storage(anyhow::anyhow!(
                    "blob for fragment {id} is missing at '{}'",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(ChartError::storage(
                    anyhow::Error::new(e).context(format!("read blob '{}'", path.display())),
                ));
            }
        };
        RgbRaster::decode_bmp(&bytes).map_err(|e| {
            ChartError::storage(anyhow::anyhow!("blob '{}' is unreadable: {e:#}", path.display()))
        })
    }

    fn delete(&self, id: FragmentId) -> ChartResult<()> {
        let path = self.path_for(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChartError::storage(
                anyhow::Error::new(e).context(format!("delete blob '{}'", path.display())),
            )),
        }
    }
}

/// In-process blob store for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<FragmentId, RgbRaster>>,
    fail_writes: AtomicBool,
}

impl InMemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent [`BlobStore::write`] fail (or succeed again with `false`).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    /// Return `true` when no blobs are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return `true` when a blob exists for `id`.
    pub fn contains(&self, id: FragmentId) -> bool {
        self.blobs
            .read()
            .map(|b| b.contains_key(&id))
            .unwrap_or(false)
    }
}

fn poisoned() -> ChartError {
    ChartError::storage(anyhow::anyhow!("in-memory blob store lock poisoned"))
}

impl BlobStore for InMemoryBlobStore {
    fn write(&self, id: FragmentId, pixels: &RgbRaster) -> ChartResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ChartError::storage(anyhow::anyhow!(
                "blob write for fragment {id} rejected"
            )));
        }
        self.blobs
            .write()
            .map_err(|_| poisoned())?
            .insert(id, pixels.clone());
        Ok(())
    }

    fn read(&self, id: FragmentId) -> ChartResult<RgbRaster> {
        self.blobs
            .read()
            .map_err(|_| poisoned())?
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                ChartError::storage(anyhow::anyhow!("blob for fragment {id} is missing"))
            })
    }

    fn delete(&self, id: FragmentId) -> ChartResult<()> {
        self.blobs.write().map_err(|_| poisoned())?.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/blob.rs"]
mod tests;
