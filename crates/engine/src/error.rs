use boundary::BoundaryError;
use core_types::ElementId;
use thiserror::Error;

/// Engine fault kinds. Only [`EngineError::Mount`] fails a content push;
/// the rest are recorded as non-fatal reports the host can drain through
/// [`crate::Engine::take_faults`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Sanitization faulted internally; the safe placeholder was rendered.
    #[error("sanitization faulted; safe placeholder substituted")]
    Sanitization,

    /// The mounted document was not ready for detection; retry on the next
    /// mount signal.
    #[error("document not ready for detection")]
    DetectionUnavailable,

    /// A commit referenced an element absent from the current catalog.
    #[error("stale edit target {0}")]
    StaleEdit(ElementId),

    /// No document context could be obtained; the only user-visible failure.
    #[error("render boundary mount failed: {0}")]
    Mount(#[from] BoundaryError),
}
