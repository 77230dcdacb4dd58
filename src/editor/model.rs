use crate::config::EditorConfig;
use crate::editor::handles::{
    CursorHint, HandleId, hit_test_body, hit_test_handle, pinned_origin, resized_width,
};
use crate::editor::transform::{ScaleBounds, Transform};
use crate::foundation::core::{Canvas, Point, Rect, Size, Vec2};

/// Pointer interaction in progress. Exactly one variant is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Moving the overlay; `offset` is pointer minus overlay position at grab time.
    Dragging {
        /// Grab offset inside the overlay.
        offset: Vec2,
    },
    /// Resizing from `handle`; `anchor` is the last pointer position seen.
    Resizing {
        /// Handle being dragged.
        handle: HandleId,
        /// Previous pointer position, for incremental deltas.
        anchor: Point,
    },
}

/// Owns the overlay [`Transform`] and the interaction state machine that mutates it.
#[derive(Clone, Debug)]
pub struct TransformModel {
    native: Size,
    transform: Transform,
    bounds: ScaleBounds,
    interaction: InteractionState,

    handle_size: f64,
    min_overlay_px: f64,
    min_scale: f64,
    default_max_scale: f64,
}

impl TransformModel {
    /// Create a model for an overlay of `native` size.
    pub fn new(native: Size, cfg: &EditorConfig) -> Self {
        Self {
            native,
            transform: Transform::default(),
            bounds: ScaleBounds::new(cfg.min_scale, cfg.default_max_scale),
            interaction: InteractionState::Idle,
            handle_size: cfg.handle_size,
            min_overlay_px: cfg.min_overlay_px,
            min_scale: cfg.min_scale,
            default_max_scale: cfg.default_max_scale,
        }
    }

    /// Current overlay transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Current interaction state.
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// Current scale bounds.
    pub fn scale_bounds(&self) -> ScaleBounds {
        self.bounds
    }

    /// Native overlay size.
    pub fn native_size(&self) -> Size {
        self.native
    }

    /// Scaled overlay bounding box.
    pub fn overlay_rect(&self) -> Rect {
        self.transform.overlay_rect(self.native)
    }

    /// Handle whose hit box contains `p`, if any.
    pub fn hit_test_handle(&self, p: Point) -> Option<HandleId> {
        hit_test_handle(self.overlay_rect(), p, self.handle_size)
    }

    /// `true` iff `p` lies strictly inside the overlay box.
    pub fn hit_test_body(&self, p: Point) -> bool {
        hit_test_body(self.overlay_rect(), p)
    }

    /// Start moving the overlay. Only valid from `Idle` with `p` inside the body.
    pub fn begin_drag(&mut self, p: Point) -> bool {
        if self.interaction != InteractionState::Idle || !self.hit_test_body(p) {
            return false;
        }
        self.interaction = InteractionState::Dragging {
            offset: p - self.transform.position,
        };
        tracing::debug!(x = p.x, y = p.y, "begin drag");
        true
    }

    /// Start resizing from `handle`. Only valid from `Idle` with `p` inside that handle's box.
    pub fn begin_resize(&mut self, p: Point, handle: HandleId) -> bool {
        if self.interaction != InteractionState::Idle {
            return false;
        }
        let half = self.handle_size / 2.0;
        let a = handle.anchor(self.overlay_rect());
        if (p.x - a.x).abs() > half || (p.y - a.y).abs() > half {
            return false;
        }
        self.interaction = InteractionState::Resizing { handle, anchor: p };
        tracing::debug!(?handle, x = p.x, y = p.y, "begin resize");
        true
    }

    /// Move the overlay so the grab offset stays under the pointer.
    pub fn update_drag(&mut self, p: Point) -> bool {
        let InteractionState::Dragging { offset } = self.interaction else {
            return false;
        };
        self.transform.position = p - offset;
        true
    }

    /// Resize by the pointer delta since the last update, keeping the opposite side pinned.
    pub fn update_resize(&mut self, p: Point) -> bool {
        let InteractionState::Resizing { handle, anchor } = self.interaction else {
            return false;
        };

        let old = self.overlay_rect();
        let aspect = self.native.width / self.native.height;
        let width = resized_width(handle, old.size(), p - anchor, aspect, self.min_overlay_px);

        let scale = self.bounds.clamp(width / self.native.width);
        let size = self.native * scale;
        self.transform = Transform {
            position: pinned_origin(handle, old, size),
            scale,
        };
        self.interaction = InteractionState::Resizing { handle, anchor: p };
        true
    }

    /// Finish any gesture.
    pub fn end(&mut self) {
        if self.interaction != InteractionState::Idle {
            tracing::debug!(transform = ?self.transform, "end interaction");
        }
        self.interaction = InteractionState::Idle;
    }

    /// Set the scale directly (size slider), clamped to the bounds. Returns the applied scale.
    pub fn set_scale(&mut self, value: f64) -> f64 {
        self.transform.scale = self.bounds.clamp(value);
        self.transform.scale
    }

    /// Route a pointer press: handles win over the body; empty space is ignored.
    pub fn pointer_down(&mut self, p: Point) -> InteractionState {
        if let Some(handle) = self.hit_test_handle(p) {
            self.begin_resize(p, handle);
        } else {
            self.begin_drag(p);
        }
        self.interaction
    }

    /// Route a pointer move to the active gesture. Returns `true` when the transform changed.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        match self.interaction {
            InteractionState::Idle => false,
            InteractionState::Dragging { .. } => self.update_drag(p),
            InteractionState::Resizing { .. } => self.update_resize(p),
        }
    }

    /// Hover feedback. Only meaningful while idle.
    pub fn cursor_at(&self, p: Point) -> CursorHint {
        if self.interaction != InteractionState::Idle {
            return CursorHint::Default;
        }
        if let Some(handle) = self.hit_test_handle(p) {
            handle.cursor()
        } else if self.hit_test_body(p) {
            CursorHint::Move
        } else {
            CursorHint::Default
        }
    }

    /// Adapt to a newly loaded background.
    ///
    /// Recomputes the scale bounds (re-clamping the current scale) and centers the overlay if it
    /// has never been moved off the origin.
    pub fn on_background_loaded(&mut self, background: Canvas) {
        self.bounds = ScaleBounds::for_background(self.min_scale, background, self.native);
        self.transform.scale = self.bounds.clamp(self.transform.scale);
        if self.transform.position == Point::ORIGIN {
            self.transform.position = self.transform.centered_position(self.native, background);
        }
        tracing::debug!(
            max_scale = self.bounds.max,
            transform = ?self.transform,
            "background loaded"
        );
    }

    /// Back to the initial transform, default bounds and no gesture.
    pub fn reset(&mut self) {
        self.transform = Transform::default();
        self.bounds = ScaleBounds::new(self.min_scale, self.default_max_scale);
        self.interaction = InteractionState::Idle;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/model.rs"]
mod tests;
