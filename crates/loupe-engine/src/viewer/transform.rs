use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::coords::AffineTransform;

/// The user-adjustable global-to-canvas transform, shared between input
/// handlers and the renderer.
///
/// Readers copy it out under the lock at the start of a pass and never hold
/// the lock while rendering. Writers must request a repaint after changing
/// it; [`InteractiveViewer`](super::InteractiveViewer) does both.
#[derive(Debug, Default)]
pub struct ViewerTransform<A> {
    current: Mutex<A>,
}

impl<A: AffineTransform> ViewerTransform<A> {
    pub fn new(initial: A) -> Self {
        Self { current: Mutex::new(initial) }
    }

    fn lock(&self) -> MutexGuard<'_, A> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current value.
    pub fn snapshot(&self) -> A {
        self.lock().clone()
    }

    pub fn set(&self, transform: &A) {
        self.lock().set(transform);
    }

    /// Mutates the value in place under the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Affine2;

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let v = ViewerTransform::new(Affine2::identity());
        let before = v.snapshot();
        v.update(|t| {
            t.translate(3.0, 4.0);
        });
        assert_eq!(before, Affine2::identity());
        assert_eq!(v.snapshot(), Affine2::from_translation(3.0, 4.0));
    }

    #[test]
    fn set_replaces_the_value() {
        let v = ViewerTransform::new(Affine2::identity());
        v.set(&Affine2::from_rotation(0.5));
        assert_eq!(v.snapshot(), Affine2::from_rotation(0.5));
    }
}
