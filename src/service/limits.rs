use crate::{
    canvas::model::Canvas,
    foundation::{
        core::Rect,
        error::{ChartError, ChartResult},
    },
};

/// Size limits enforced at the request boundary, before anything is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest accepted canvas width.
    pub max_canvas_width: u32,
    /// Largest accepted canvas height.
    pub max_canvas_height: u32,
    /// Largest accepted fragment width.
    pub max_fragment_width: u32,
    /// Largest accepted fragment height.
    pub max_fragment_height: u32,
    /// Largest renderable region width.
    pub max_region_width: u32,
    /// Largest renderable region height.
    pub max_region_height: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_canvas_width: 20_000,
            max_canvas_height: 50_000,
            max_fragment_width: 20_000,
            max_fragment_height: 50_000,
            max_region_width: 5_000,
            max_region_height: 5_000,
        }
    }
}

impl Limits {
    /// Validate the size of a new canvas.
    pub fn check_canvas(&self, width: u32, height: u32) -> ChartResult<()> {
        check_extent("canvas", width, height, self.max_canvas_width, self.max_canvas_height)
    }

    /// Validate a fragment upload against `canvas`. Its origin must lie on the canvas; its extent
    /// may run past the canvas edge.
    pub fn check_fragment(&self, canvas: &Canvas, rect: Rect) -> ChartResult<()> {
        check_extent(
            "fragment",
            rect.width,
            rect.height,
            self.max_fragment_width,
            self.max_fragment_height,
        )?;
        check_origin("fragment", canvas, rect)
    }

    /// Validate a render request against `canvas`.
    pub fn check_region(&self, canvas: &Canvas, rect: Rect) -> ChartResult<()> {
        check_extent(
            "region",
            rect.width,
            rect.height,
            self.max_region_width,
            self.max_region_height,
        )?;
        check_origin("region", canvas, rect)
    }
}

fn check_extent(what: &str, width: u32, height: u32, max_w: u32, max_h: u32) -> ChartResult<()> {
    if width == 0 || height == 0 {
        return Err(ChartError::invalid_geometry(format!(
            "{what} size must be positive, got {width}x{height}"
        )));
    }
    if width > max_w || height > max_h {
        return Err(ChartError::invalid_geometry(format!(
            "{what} size {width}x{height} exceeds the {max_w}x{max_h} limit"
        )));
    }
    Ok(())
}

fn check_origin(what: &str, canvas: &Canvas, rect: Rect) -> ChartResult<()> {
    let inside = (0..i64::from(canvas.width)).contains(&rect.x)
        && (0..i64::from(canvas.height)).contains(&rect.y);
    if !inside {
        return Err(ChartError::invalid_geometry(format!(
            "{what} origin ({}, {}) is outside canvas {} ({}x{})",
            rect.x, rect.y, canvas.id, canvas.width, canvas.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/service/limits.rs"]
mod tests;
