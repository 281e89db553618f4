use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width(), 1);
    assert_eq!(prepared.height(), 1);
    assert_eq!(
        prepared.premul_bytes(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn premul_length_mismatch_is_rejected() {
    assert!(PreparedImage::from_premul_rgba8(2, 2, &[0u8; 8]).is_err());
    assert!(PreparedImage::from_premul_rgba8(0, 1, &[]).is_err());
}

#[test]
fn unpremultiply_restores_opaque_and_half_alpha() {
    let mut px = vec![255u8, 0, 0, 255, 64, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[255, 0, 0, 255]);
    assert_eq!(px[4], 128);
    assert_eq!(px[5], 64);
    assert_eq!(px[7], 128);
}
