use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn new_surface_is_transparent() {
    let s = Surface::new(canvas(3, 2));
    assert_eq!(s.data.len(), 24);
    assert!(s.data.iter().all(|&b| b == 0));
    assert_eq!(s.pixel(3, 0), None);
}

#[test]
fn fill_rect_is_clipped_to_surface() {
    let mut s = Surface::new(canvas(4, 4));
    s.fill_rect(Rect::new(-2.0, -2.0, 2.0, 2.0), [255, 0, 0, 255]);
    assert_eq!(s.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(2, 2), Some([0, 0, 0, 0]));
}

#[test]
fn one_pixel_stroke_covers_only_the_edges() {
    let mut s = Surface::new(canvas(10, 10));
    s.stroke_rect(Rect::new(2.0, 2.0, 8.0, 8.0), 1.0, [0, 0, 255, 255]);
    assert_eq!(s.pixel(2, 2), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(8, 5), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(8, 8), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(3, 5), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(7, 5), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(9, 9), Some([0, 0, 0, 0]));
}

#[test]
fn two_pixel_stroke_straddles_the_edge() {
    let mut s = Surface::new(canvas(10, 10));
    s.stroke_rect(Rect::new(2.0, 2.0, 8.0, 8.0), 2.0, [0, 0, 255, 255]);
    assert_eq!(s.pixel(1, 5), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(2, 5), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(3, 5), Some([0, 0, 0, 0]));
}

#[test]
fn draw_raster_stretches_and_clips() {
    let src = RasterImage::solid(2, 2, [0, 255, 0, 255]).unwrap();
    let mut s = Surface::new(canvas(8, 8));
    s.draw_raster(&src, Rect::new(4.0, 4.0, 12.0, 12.0)).unwrap();
    assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(4, 4), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(7, 7), Some([0, 255, 0, 255]));
}

#[test]
fn draw_raster_fully_off_surface_is_noop() {
    let src = RasterImage::solid(2, 2, [0, 255, 0, 255]).unwrap();
    let mut s = Surface::new(canvas(4, 4));
    s.draw_raster(&src, Rect::new(-10.0, -10.0, -5.0, -5.0)).unwrap();
    assert!(s.data.iter().all(|&b| b == 0));
}

#[test]
fn png_is_decodable_at_native_size() {
    let mut s = Surface::new(canvas(5, 3));
    s.clear([10, 20, 30, 255]);
    let png = s.encode_png().unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (5, 3));
    assert_eq!(img.get_pixel(4, 2).0, [10, 20, 30, 255]);
}
