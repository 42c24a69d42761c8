use std::io::Cursor;

use super::*;

#[test]
fn filled_sets_every_pixel() {
    let r = RgbRaster::filled(3, 2, Rgb8::new(1, 2, 3));
    assert_eq!(r.data.len(), 3 * 2 * BYTES_PER_PIXEL);
    for y in 0..2 {
        for x in 0..3 {
            assert_eq!(r.pixel(x, y), Rgb8::new(1, 2, 3));
        }
    }
}

#[test]
fn from_raw_checks_length() {
    assert!(RgbRaster::from_raw(2, 2, vec![0; 12]).is_ok());
    assert!(matches!(
        RgbRaster::from_raw(2, 2, vec![0; 11]),
        Err(ChartError::InvalidGeometry(_))
    ));
}

#[test]
fn set_pixel_is_row_major() {
    let mut r = RgbRaster::filled(4, 3, Rgb8::BLACK);
    r.set_pixel(1, 2, Rgb8::new(9, 8, 7));
    let i = (2 * 4 + 1) * BYTES_PER_PIXEL;
    assert_eq!(&r.data[i..i + 3], &[9, 8, 7]);
}

#[test]
fn bmp_encoding_is_lossless() {
    let mut r = RgbRaster::filled(5, 3, Rgb8::new(10, 20, 30));
    r.set_pixel(4, 0, Rgb8::new(255, 0, 128));
    r.set_pixel(0, 2, Rgb8::new(1, 254, 3));

    let bytes = r.encode_bmp().unwrap();
    assert_eq!(&bytes[..2], b"BM");
    assert_eq!(RgbRaster::decode_bmp(&bytes).unwrap(), r);
    assert_eq!(RgbRaster::decode(&bytes).unwrap(), r);
}

#[test]
fn decode_accepts_png_and_drops_alpha() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50, 200, 128]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let r = RgbRaster::decode(&buf).unwrap();
    assert_eq!((r.width, r.height), (1, 1));
    assert_eq!(r.pixel(0, 0), Rgb8::new(100, 50, 200));
}

#[test]
fn decode_rejects_garbage() {
    assert!(RgbRaster::decode(b"not an image").is_err());
    assert!(RgbRaster::decode_bmp(b"BM").is_err());
}

#[test]
fn decoder_accepts_largest_default_fragment() {
    let fragment = crate::service::limits::Limits::default();
    let limits = decode_limits();
    assert!(
        limits
            .check_dimensions(fragment.max_fragment_width, fragment.max_fragment_height)
            .is_ok()
    );
    let bytes = u64::from(fragment.max_fragment_width)
        * u64::from(fragment.max_fragment_height)
        * BYTES_PER_PIXEL as u64;
    assert!(limits.max_alloc.is_none_or(|cap| cap >= bytes));
}

#[test]
fn bmp_roundtrip_goes_through_limited_reader() {
    let mut r = RgbRaster::filled(640, 480, Rgb8::new(9, 8, 7));
    r.set_pixel(639, 479, Rgb8::new(1, 2, 3));
    let bytes = r.encode_bmp().unwrap();
    assert_eq!(RgbRaster::decode_bmp(&bytes).unwrap(), r);
    assert_eq!(RgbRaster::decode(&bytes).unwrap(), r);
}
