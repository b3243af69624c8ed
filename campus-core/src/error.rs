//! Error types for the campus site, plus the handler boundary.
//!
//! Library operations return [`CampusResult`]. User-facing handlers (story
//! navigation, calendar navigation) run through [`guarded`], which logs and
//! suppresses every failure so a broken handler leaves the widget frozen at
//! its current state instead of tearing it down.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Errors that can occur in campus operations.
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Content error: {0}")]
    Content(String),

    #[error("Story not found: {0}")]
    StoryNotFound(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for campus operations.
pub type CampusResult<T> = Result<T, CampusError>;

/// A UI event that escaped into an error path.
///
/// Raised (as a panic payload) by presentation code that forwards raw input
/// events where a real error was expected. It is never a real failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrayEvent {
    pub kind: String,
}

impl StrayEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        StrayEvent { kind: kind.into() }
    }
}

/// A normalized handler failure.
#[derive(Debug)]
pub enum Fault {
    /// The handler returned an error.
    Error(CampusError),
    /// An event-like object surfaced instead of an error.
    StrayEvent(StrayEvent),
    /// The handler panicked with something else.
    Panic(String),
}

impl Fault {
    /// Classify a panic payload.
    pub fn normalize(payload: Box<dyn Any + Send>) -> Fault {
        let payload = match payload.downcast::<StrayEvent>() {
            Ok(event) => return Fault::StrayEvent(*event),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<CampusError>() {
            Ok(err) => return Fault::Error(*err),
            Err(payload) => payload,
        };
        if let Some(msg) = payload.downcast_ref::<&str>() {
            return Fault::Panic((*msg).to_string());
        }
        if let Some(msg) = payload.downcast_ref::<String>() {
            return Fault::Panic(msg.clone());
        }
        Fault::Panic("unknown panic payload".to_string())
    }

    /// Whether this fault is an event object rather than a real error.
    pub fn is_stray_event(&self) -> bool {
        matches!(self, Fault::StrayEvent(_))
    }

    fn log(&self, handler: &str) {
        match self {
            Fault::Error(err) => tracing::error!(handler, error = %err, "handler failed"),
            Fault::StrayEvent(event) => {
                tracing::warn!(handler, kind = %event.kind, "caught event object in handler")
            }
            Fault::Panic(msg) => tracing::error!(handler, panic = %msg, "handler panicked"),
        }
    }
}

impl From<CampusError> for Fault {
    fn from(err: CampusError) -> Self {
        Fault::Error(err)
    }
}

/// Run a handler body, logging and discarding any failure.
///
/// Returns `None` when the handler failed; callers treat that as a no-op.
pub fn guarded<T>(handler: &str, f: impl FnOnce() -> CampusResult<T>) -> Option<T> {
    match run_handler(f) {
        Ok(value) => Some(value),
        Err(fault) => {
            fault.log(handler);
            None
        }
    }
}

/// Run a handler body and return the normalized fault instead of logging it.
pub fn run_handler<T>(f: impl FnOnce() -> CampusResult<T>) -> Result<T, Fault> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(Fault::Error(err)),
        Err(payload) => Err(Fault::normalize(payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_passes_value_through() {
        assert_eq!(guarded("noop", || Ok(7)), Some(7));
    }

    #[test]
    fn test_guarded_suppresses_errors() {
        let result: Option<()> =
            guarded("load", || Err(CampusError::Content("missing".into())));
        assert!(result.is_none());
    }

    #[test]
    fn test_stray_event_is_classified() {
        let fault = run_handler::<()>(|| std::panic::panic_any(StrayEvent::new("click")))
            .unwrap_err();
        assert!(fault.is_stray_event());
        match fault {
            Fault::StrayEvent(event) => assert_eq!(event.kind, "click"),
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn test_string_panics_keep_their_message() {
        let fault = run_handler::<()>(|| panic!("slide index {} out of range", 4)).unwrap_err();
        match fault {
            Fault::Panic(msg) => assert_eq!(msg, "slide index 4 out of range"),
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn test_guarded_survives_stray_event() {
        let result: Option<u8> =
            guarded("toggle", || std::panic::panic_any(StrayEvent::new("pointerup")));
        assert!(result.is_none());
    }
}
