use crate::{
    canvas::{model::Canvas, model::Fragment, overlap::find_intersecting},
    foundation::{
        core::{Rect, Rgb8},
        error::{ChartError, ChartResult},
    },
    render::raster::{BYTES_PER_PIXEL, RgbRaster},
    store::blob::BlobStore,
};

/// Render `viewport` of `canvas` into a new raster of exactly `viewport`'s size.
///
/// Pixels not covered by any fragment, including everything outside the canvas, are `background`.
/// `fragments` must be the canvas's fragments oldest-first.
pub fn render<B: BlobStore + ?Sized>(
    canvas: &Canvas,
    fragments: &[Fragment],
    viewport: Rect,
    background: Rgb8,
    blobs: &B,
) -> ChartResult<RgbRaster> {
    let mut out = RgbRaster::filled(viewport.width, viewport.height, background);
    render_into(&mut out, canvas, fragments, viewport, blobs)?;
    Ok(out)
}

/// Paint every fragment intersecting `viewport` onto `out`, oldest first.
///
/// `out` must already be `viewport.width x viewport.height`; pixels no fragment reaches are left
/// as they are. Each fragment's contribution is clipped to the overlap of the fragment, the
/// viewport and the canvas. A fragment whose blob is missing or whose stored size disagrees with
/// its record fails the whole render.
#[tracing::instrument(skip(out, canvas, fragments, blobs), fields(canvas_id = %canvas.id))]
pub fn render_into<B: BlobStore + ?Sized>(
    out: &mut RgbRaster,
    canvas: &Canvas,
    fragments: &[Fragment],
    viewport: Rect,
    blobs: &B,
) -> ChartResult<()> {
    if out.width != viewport.width || out.height != viewport.height {
        return Err(ChartError::invalid_geometry(format!(
            "output raster is {}x{}, viewport is {}x{}",
            out.width, out.height, viewport.width, viewport.height
        )));
    }

    let canvas_w = i64::from(canvas.width);
    let canvas_h = i64::from(canvas.height);
    let out_stride = (viewport.width as usize) * BYTES_PER_PIXEL;

    for fragment in find_intersecting(fragments, viewport) {
        let f = fragment.rect;
        let (start_y, end_y) = clip_span(f.y, f.bottom(), viewport.y, viewport.bottom(), canvas_h);
        let (start_x, end_x) = clip_span(f.x, f.right(), viewport.x, viewport.right(), canvas_w);
        if start_y >= end_y || start_x >= end_x {
            tracing::debug!(fragment = %fragment.id, "no visible overlap");
            continue;
        }

        let pixels = blobs.read(fragment.id)?;
        if pixels.width != f.width || pixels.height != f.height {
            return Err(ChartError::storage(anyhow::anyhow!(
                "blob for fragment {} is {}x{}, record says {}x{}",
                fragment.id,
                pixels.width,
                pixels.height,
                f.width,
                f.height
            )));
        }
        tracing::debug!(
            fragment = %fragment.id,
            rows = end_y - start_y,
            cols = end_x - start_x,
            "compositing fragment"
        );

        let src_stride = (f.width as usize) * BYTES_PER_PIXEL;
        let run = ((end_x - start_x) as usize) * BYTES_PER_PIXEL;
        let src_x = (start_x - f.x) as usize;
        let dst_x = insert_position(start_x, viewport.x, i64::from(f.width), canvas_w);
        debug_assert!(dst_x >= 0 && dst_x < i64::from(viewport.width));

        for i in start_y..end_y {
            let dst_y = insert_position(i, viewport.y, i64::from(f.height), canvas_h);
            debug_assert!(dst_y >= 0 && dst_y < i64::from(viewport.height));
            let src_y = (i - f.y) as usize;

            let src = src_y * src_stride + src_x * BYTES_PER_PIXEL;
            let dst = (dst_y as usize) * out_stride + (dst_x as usize) * BYTES_PER_PIXEL;
            out.data[dst..dst + run].copy_from_slice(&pixels.data[src..src + run]);
        }
    }

    Ok(())
}

/// Output coordinate for canvas coordinate `current` along one axis.
///
/// `origin` is the viewport's origin on that axis, `fragment_extent` the fragment's width or
/// height and `canvas_extent` the canvas's. Since `min(o + f, c) == o + min(f, c - o)` this always
/// equals `current - origin`.
pub fn insert_position(current: i64, origin: i64, fragment_extent: i64, canvas_extent: i64) -> i64 {
    fragment_extent.min(canvas_extent - origin)
        - ((origin + fragment_extent).min(canvas_extent) - current)
}

/// Half-open `[start, end)` of the fragment span `[f0, f1)` that is inside both the viewport span
/// `[v0, v1)` and the canvas span `[0, canvas_extent)`.
fn clip_span(f0: i64, f1: i64, v0: i64, v1: i64, canvas_extent: i64) -> (i64, i64) {
    let start = f0.max(v0).max(0);
    let end = v1.min(f1.min(canvas_extent));
    (start, end)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
