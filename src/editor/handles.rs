use crate::foundation::core::{Point, Rect, Size, Vec2};

/// One of the eight resize handles around the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleId {
    /// Top-left corner.
    Nw,
    /// Top-right corner.
    Ne,
    /// Bottom-left corner.
    Sw,
    /// Bottom-right corner.
    Se,
    /// Top edge midpoint.
    N,
    /// Right edge midpoint.
    E,
    /// Bottom edge midpoint.
    S,
    /// Left edge midpoint.
    W,
}

/// Cursor feedback for hover over the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    /// Nothing interactive under the pointer.
    Default,
    /// Pointer over the overlay body.
    Move,
    /// Diagonal resize, top-left to bottom-right.
    NwseResize,
    /// Diagonal resize, top-right to bottom-left.
    NeswResize,
    /// Vertical resize.
    NsResize,
    /// Horizontal resize.
    EwResize,
}

impl HandleId {
    /// Hit-test order: corners first, then edge midpoints.
    pub const ALL: [HandleId; 8] = [
        HandleId::Nw,
        HandleId::Ne,
        HandleId::Sw,
        HandleId::Se,
        HandleId::N,
        HandleId::E,
        HandleId::S,
        HandleId::W,
    ];

    /// Anchor point of this handle on `rect`.
    pub fn anchor(self, rect: Rect) -> Point {
        let c = rect.center();
        match self {
            HandleId::Nw => Point::new(rect.x0, rect.y0),
            HandleId::Ne => Point::new(rect.x1, rect.y0),
            HandleId::Sw => Point::new(rect.x0, rect.y1),
            HandleId::Se => Point::new(rect.x1, rect.y1),
            HandleId::N => Point::new(c.x, rect.y0),
            HandleId::E => Point::new(rect.x1, c.y),
            HandleId::S => Point::new(c.x, rect.y1),
            HandleId::W => Point::new(rect.x0, c.y),
        }
    }

    /// Square hit box of side `size` centered on the anchor.
    pub fn hit_box(self, rect: Rect, size: f64) -> Rect {
        Rect::from_center_size(self.anchor(rect), Size::new(size, size))
    }

    /// Cursor shown while hovering this handle.
    pub fn cursor(self) -> CursorHint {
        match self {
            HandleId::Nw | HandleId::Se => CursorHint::NwseResize,
            HandleId::Ne | HandleId::Sw => CursorHint::NeswResize,
            HandleId::N | HandleId::S => CursorHint::NsResize,
            HandleId::E | HandleId::W => CursorHint::EwResize,
        }
    }

    /// Horizontal growth direction: `1` grows rightward, `-1` leftward, `0` for N/S.
    fn x_sign(self) -> f64 {
        match self {
            HandleId::Ne | HandleId::Se | HandleId::E => 1.0,
            HandleId::Nw | HandleId::Sw | HandleId::W => -1.0,
            HandleId::N | HandleId::S => 0.0,
        }
    }

    /// Vertical growth direction: `1` grows downward, `-1` upward, `0` for E/W.
    fn y_sign(self) -> f64 {
        match self {
            HandleId::Sw | HandleId::Se | HandleId::S => 1.0,
            HandleId::Nw | HandleId::Ne | HandleId::N => -1.0,
            HandleId::E | HandleId::W => 0.0,
        }
    }
}

/// First handle whose hit box contains `p` (inclusive bounds).
pub fn hit_test_handle(rect: Rect, p: Point, handle_size: f64) -> Option<HandleId> {
    let half = handle_size / 2.0;
    HandleId::ALL.into_iter().find(|h| {
        let a = h.anchor(rect);
        p.x >= a.x - half && p.x <= a.x + half && p.y >= a.y - half && p.y <= a.y + half
    })
}

/// `true` iff `p` is strictly inside `rect`.
pub fn hit_test_body(rect: Rect, p: Point) -> bool {
    p.x > rect.x0 && p.x < rect.x1 && p.y > rect.y0 && p.y < rect.y1
}

/// Width the overlay would take after dragging `handle` by `delta`, aspect ratio locked.
///
/// Corners follow whichever delta component is larger (ties go horizontal); edge handles follow
/// their own axis. The driven dimension is floored at `min_px` before the other is derived.
pub(crate) fn resized_width(
    handle: HandleId,
    current: Size,
    delta: Vec2,
    aspect: f64,
    min_px: f64,
) -> f64 {
    let horizontal = match handle {
        HandleId::E | HandleId::W => true,
        HandleId::N | HandleId::S => false,
        _ => delta.x.abs() >= delta.y.abs(),
    };

    if horizontal {
        (current.width + handle.x_sign() * delta.x).max(min_px)
    } else {
        let height = (current.height + handle.y_sign() * delta.y).max(min_px);
        height * aspect
    }
}

/// Top-left of a box of `size` that keeps the side opposite `handle` on `old` fixed.
///
/// Edge handles keep the orthogonal axis centered on its previous midpoint.
pub(crate) fn pinned_origin(handle: HandleId, old: Rect, size: Size) -> Point {
    let c = old.center();
    let x = match handle.x_sign() {
        s if s > 0.0 => old.x0,
        s if s < 0.0 => old.x1 - size.width,
        _ => c.x - size.width / 2.0,
    };
    let y = match handle.y_sign() {
        s if s > 0.0 => old.y0,
        s if s < 0.0 => old.y1 - size.height,
        _ => c.y - size.height / 2.0,
    };
    Point::new(x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/editor/handles.rs"]
mod tests;
