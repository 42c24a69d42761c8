//! Chartographer stores images too large to keep as single files.
//!
//! A [`Canvas`] is a fixed-size logical image that is built up from rectangular [`Fragment`]s
//! uploaded over time. Any region of a canvas can later be rendered on demand by compositing the
//! stored fragments that intersect it.
//!
//! # Pipeline overview
//!
//! 1. **Insert**: record the fragment, write its pixels, then prune older fragments it fully
//!    covers ([`prune_contained`]).
//! 2. **Resolve**: select the fragments intersecting a region, oldest first
//!    ([`find_intersecting`]).
//! 3. **Composite**: paint them onto a background-filled [`RgbRaster`], clipped to the fragment,
//!    the region and the canvas ([`render`]).
//!
//! Fragment records live in a [`MetadataStore`] and pixels in a [`BlobStore`]; the engine keeps no
//! state between calls. Insertion order (`seq`) is the only layering rule: newer fragments win.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod canvas;
mod foundation;
mod render;
mod service;
mod store;

pub use canvas::model::{Canvas, Fragment, NewFragment};
pub use canvas::overlap::{find_intersecting, prune_contained};
pub use foundation::core::{CanvasId, FragmentId, Rect, Rgb8, contains, intersects};
pub use foundation::error::{ChartError, ChartResult};
pub use render::compositor::{insert_position, render, render_into};
pub use render::raster::{BYTES_PER_PIXEL, RgbRaster};
pub use service::chartographer::Chartographer;
pub use service::config::ChartographerConfig;
pub use service::limits::Limits;
pub use store::blob::{BlobStore, FsBlobStore, InMemoryBlobStore};
pub use store::metadata::{InMemoryMetadataStore, MetadataStore};
pub use store::sqlite::SqliteMetadataStore;
