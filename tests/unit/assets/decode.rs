use std::io::Cursor;

use super::*;

#[test]
fn decode_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let raster = decode_glyph_image(&buf).unwrap();
    assert_eq!(raster.width(), 1);
    assert_eq!(raster.height(), 1);
    assert_eq!(raster.image.as_raw().as_slice(), src_rgba.as_slice());
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_glyph_image(b"not an image").is_err());
}

#[test]
fn read_missing_file_names_the_path() {
    let err = read_glyph_image(Path::new("definitely/missing/upper_a.png")).unwrap_err();
    assert!(format!("{err:#}").contains("upper_a.png"));
}
