use std::io::Cursor;

use super::*;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn accepts_minimum_size() {
    let bg = ingest_background(&png(500, 500), 500).unwrap();
    assert_eq!(
        bg.canvas(),
        Canvas {
            width: 500,
            height: 500
        }
    );
}

#[test]
fn rejects_either_axis_below_minimum() {
    for (w, h) in [(499, 800), (800, 499)] {
        let err = ingest_background(&png(w, h), 500).unwrap_err();
        assert!(matches!(err, MemeError::Validation(_)), "{w}x{h}");
        assert!(err.to_string().contains("500x500"));
    }
}

#[test]
fn trusted_backgrounds_skip_size_check() {
    let bg = accept_trusted_background(&png(64, 64)).unwrap();
    assert_eq!(bg.raster().width, 64);
}

#[test]
fn overlay_reports_native_size() {
    let overlay = OverlayAsset::from_bytes(&png(40, 20)).unwrap();
    assert_eq!(overlay.native_size(), Size::new(40.0, 20.0));
}
