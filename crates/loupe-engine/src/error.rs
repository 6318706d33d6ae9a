use std::any::Any;
use std::fmt;
use std::time::Duration;

/// Errors surfaced by the rendering engine.
///
/// A cancelled pass is not an error; the kernel reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Construction-time configuration was rejected.
    InvalidConfig(String),
    /// The kernel's worker pool could not be started.
    WorkerPool(String),
    /// Source data does not match its declared shape.
    InvalidSource(String),
    /// A kernel worker panicked (sampler or converter fault).
    WorkerPanicked(String),
    /// A pass exceeded its deadline and was abandoned.
    TimedOut(Duration),
    /// The composed source-to-screen transform is not invertible.
    SingularTransform,
}

impl RenderError {
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        RenderError::WorkerPanicked(panic_message(payload))
    }
}

/// Best-effort message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidConfig(msg) => write!(f, "invalid renderer configuration: {msg}"),
            RenderError::WorkerPool(msg) => write!(f, "failed to start render workers: {msg}"),
            RenderError::InvalidSource(msg) => write!(f, "invalid source: {msg}"),
            RenderError::WorkerPanicked(msg) => write!(f, "render worker panicked: {msg}"),
            RenderError::TimedOut(after) => write!(f, "render pass timed out after {after:?}"),
            RenderError::SingularTransform => {
                write!(f, "source-to-screen transform is not invertible")
            }
        }
    }
}

impl std::error::Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_become_messages() {
        let caught = std::panic::catch_unwind(|| panic!("bad sample at {}", 3)).unwrap_err();
        assert_eq!(
            RenderError::from_panic(caught.as_ref()),
            RenderError::WorkerPanicked("bad sample at 3".into())
        );

        let caught = std::panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(
            RenderError::from_panic(caught.as_ref()),
            RenderError::WorkerPanicked("static".into())
        );
    }

    #[test]
    fn display_names_the_failure() {
        let e = RenderError::InvalidConfig("no scales".into());
        assert_eq!(e.to_string(), "invalid renderer configuration: no scales");
    }
}
