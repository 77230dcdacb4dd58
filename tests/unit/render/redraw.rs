use super::*;
use crate::foundation::core::Canvas;
use crate::foundation::error::MemeError;

fn blank() -> MemeResult<Surface> {
    Ok(Surface::new(Canvas::new(2, 2).unwrap()))
}

#[test]
fn many_invalidations_cause_one_redraw() {
    let mut rl = RenderLoop::new();
    rl.flush(blank).unwrap();
    for _ in 0..5 {
        rl.invalidate();
    }
    rl.flush(blank).unwrap();
    assert_eq!(rl.redraw_count(), 2);
}

#[test]
fn clean_flush_reuses_frame() {
    let mut rl = RenderLoop::new();
    rl.flush(blank).unwrap();
    assert!(!rl.is_dirty());
    let frame = rl
        .flush(|| panic!("clean loop must not re-render"))
        .unwrap();
    assert_eq!(frame.width, 2);
    assert_eq!(rl.redraw_count(), 1);
}

#[test]
fn failed_render_stays_dirty() {
    let mut rl = RenderLoop::new();
    assert!(rl.flush(|| Err(MemeError::validation("boom"))).is_err());
    assert!(rl.is_dirty());
    rl.flush(blank).unwrap();
    assert!(!rl.is_dirty());
}
