use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::foundation::{
    core::Rgb8,
    error::{ChartError, ChartResult},
};

/// Bytes per pixel in an [`RgbRaster`].
pub const BYTES_PER_PIXEL: usize = 3;

/// An opaque RGB8 pixel buffer.
///
/// Used both for fragment blobs and for compositor output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbRaster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl RgbRaster {
    /// A raster of the given size with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        let px = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(px * BYTES_PER_PIXEL);
        for _ in 0..px {
            data.extend_from_slice(&color.to_array());
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap raw row-major RGB8 bytes, checking the length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> ChartResult<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(ChartError::invalid_geometry(format!(
                "raster {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Read the pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        let i = self.offset(x, y);
        Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Overwrite the pixel at `(x, y)`. Panics when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb8) {
        let i = self.offset(x, y);
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_array());
    }

    /// Encode as an uncompressed 24-bit BMP.
    pub fn encode_bmp(&self) -> ChartResult<Vec<u8>> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ChartError::invalid_geometry("raster buffer does not match its size"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Bmp)
            .context("encode bmp")?;
        Ok(buf)
    }

    /// Decode any image format known to the `image` crate and convert it to RGB8.
    pub fn decode(bytes: &[u8]) -> ChartResult<Self> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .context("guess image format")?;
        Self::decode_with(reader, "decode image from memory")
    }

    /// Decode a BMP produced by [`RgbRaster::encode_bmp`].
    pub fn decode_bmp(bytes: &[u8]) -> ChartResult<Self> {
        let reader = image::ImageReader::with_format(Cursor::new(bytes), image::ImageFormat::Bmp);
        Self::decode_with(reader, "decode bmp from memory")
    }

    fn decode_with(
        mut reader: image::ImageReader<Cursor<&[u8]>>,
        what: &'static str,
    ) -> ChartResult<Self> {
        reader.limits(decode_limits());
        let dyn_img = reader.decode().context(what)?;
        Ok(Self::from_rgb_image(dyn_img.into_rgb8()))
    }

    /// Read and decode an image file.
    pub fn load(path: &Path) -> ChartResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    /// Write this raster as a BMP file.
    pub fn save_bmp(&self, path: &Path) -> ChartResult<()> {
        let bytes = self.encode_bmp()?;
        std::fs::write(path, bytes).with_context(|| format!("write bmp '{}'", path.display()))?;
        Ok(())
    }

    fn from_rgb_image(rgb: image::RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        Self {
            width,
            height,
            data: rgb.into_raw(),
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width,
            self.height
        );
        ((y as usize) * (self.width as usize) + (x as usize)) * BYTES_PER_PIXEL
    }
}

/// Decoder limits for fragment blobs and uploads: no allocation cap, image size is bounded by the
/// request limits before anything is stored.
pub(crate) fn decode_limits() -> image::Limits {
    image::Limits::no_limits()
}

fn expected_len(width: u32, height: u32) -> ChartResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| ChartError::invalid_geometry("raster size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
