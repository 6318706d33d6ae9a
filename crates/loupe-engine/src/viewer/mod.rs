//! Interactive viewing: the shared viewer transform and a ready-made
//! assembly of renderer, target and painter thread.

mod interactive;
mod transform;

pub use interactive::InteractiveViewer;
pub use transform::ViewerTransform;
