//! Scoped document mutations. Each guard applies its change on acquire and undoes it on drop, so
//! teardown in any order leaves the surface as it was found.

use crate::scene::host::SharedViewport;

/// Sets the transitioning container flag and locks scrolling while held.
pub struct ViewportLock {
    surface: SharedViewport,
}

impl ViewportLock {
    /// Set the flag and the lock on `surface`.
    pub fn acquire(surface: &SharedViewport) -> Self {
        {
            let mut s = surface.borrow_mut();
            s.set_transitioning_class(true);
            s.set_scroll_locked(true);
        }
        tracing::trace!("viewport locked");
        Self {
            surface: surface.clone(),
        }
    }
}

impl Drop for ViewportLock {
    fn drop(&mut self) {
        match self.surface.try_borrow_mut() {
            Ok(mut s) => {
                s.set_transitioning_class(false);
                s.set_scroll_locked(false);
                tracing::trace!("viewport unlocked");
            }
            Err(_) => tracing::warn!("viewport busy; lock not restored"),
        }
    }
}

impl std::fmt::Debug for ViewportLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportLock").finish_non_exhaustive()
    }
}

/// Temporarily enlarges the scrollable height. Restores height and offset on drop.
pub struct ScrollExtension {
    surface: SharedViewport,
    original_height: f64,
    original_offset: f64,
}

impl ScrollExtension {
    /// Grow the document on `surface` by `extra`.
    pub fn acquire(surface: &SharedViewport, extra: f64) -> Self {
        let (original_height, original_offset) = {
            let mut s = surface.borrow_mut();
            let h = s.scroll_height();
            let o = s.scroll_offset();
            s.set_scroll_height(h + extra);
            (h, o)
        };
        tracing::debug!(original_height, extra, "scroll height extended");
        Self {
            surface: surface.clone(),
            original_height,
            original_offset,
        }
    }

    /// Height before the extension.
    pub fn original_height(&self) -> f64 {
        self.original_height
    }

    /// Offset before the extension.
    pub fn original_offset(&self) -> f64 {
        self.original_offset
    }
}

impl Drop for ScrollExtension {
    fn drop(&mut self) {
        match self.surface.try_borrow_mut() {
            Ok(mut s) => {
                s.set_scroll_height(self.original_height);
                s.scroll_to(self.original_offset);
                tracing::debug!(height = self.original_height, "scroll height restored");
            }
            Err(_) => tracing::warn!("viewport busy; scroll extension not restored"),
        }
    }
}

impl std::fmt::Debug for ScrollExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollExtension")
            .field("original_height", &self.original_height)
            .field("original_offset", &self.original_offset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/lock.rs"]
mod tests;
