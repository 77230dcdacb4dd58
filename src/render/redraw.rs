use crate::foundation::error::MemeResult;
use crate::render::surface::Surface;

/// Dirty-flag driven preview redraw.
///
/// Mutations call [`RenderLoop::invalidate`]; the frame is re-rendered at most once per
/// [`RenderLoop::flush`] no matter how many mutations preceded it.
#[derive(Debug)]
pub struct RenderLoop {
    dirty: bool,
    redraws: u64,
    frame: Option<Surface>,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    /// Starts dirty so the first flush always renders.
    pub fn new() -> Self {
        Self {
            dirty: true,
            redraws: 0,
            frame: None,
        }
    }

    /// Mark the current frame stale.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Return `true` when the next flush will redraw.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.frame.is_none()
    }

    /// Number of redraws performed so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Re-render through `render` if stale, then return the current frame.
    ///
    /// A failed render leaves the loop dirty.
    pub fn flush<F>(&mut self, render: F) -> MemeResult<&Surface>
    where
        F: FnOnce() -> MemeResult<Surface>,
    {
        let frame = match self.frame.take() {
            Some(frame) if !self.dirty => frame,
            _ => {
                let frame = render()?;
                self.redraws += 1;
                self.dirty = false;
                tracing::trace!(redraws = self.redraws, "preview redrawn");
                frame
            }
        };
        Ok(self.frame.insert(frame))
    }

    /// Drop the cached frame and start over.
    pub fn reset(&mut self) {
        self.frame = None;
        self.dirty = true;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/redraw.rs"]
mod tests;
