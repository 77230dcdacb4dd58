use super::*;

const MAX: Size = Size::new(1000.0, 1500.0);

#[test]
fn small_raster_is_not_enlarged() {
    let p = CanvasPresentation::fit(Canvas::new(600, 800).unwrap(), MAX);
    assert_eq!(p.display, Size::new(600.0, 800.0));
    assert_eq!(p.zoom(), 1.0);
}

#[test]
fn wide_raster_is_bounded_by_width() {
    let p = CanvasPresentation::fit(Canvas::new(4000, 2000).unwrap(), MAX);
    assert_eq!(p.display, Size::new(1000.0, 500.0));
}

#[test]
fn tall_raster_is_bounded_by_height_after_width() {
    let p = CanvasPresentation::fit(Canvas::new(2000, 4000).unwrap(), MAX);
    assert_eq!(p.display, Size::new(750.0, 1500.0));
    assert_eq!(p.raster, Canvas::new(2000, 4000).unwrap());
}
