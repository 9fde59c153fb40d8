//! Error types for drag bindings.
//!
//! Every variant is a caller precondition violation. Nothing here is a
//! transient runtime condition, so none of these are retried.

/// Errors raised while building or dispatching drag bindings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DragError {
    /// A scale could not map a domain value into screen space.
    #[error("scale cannot map domain value {0} to a screen position")]
    Unmappable(f64),
    /// A scale could not map a screen position back into the domain.
    #[error("scale cannot invert screen position {0}")]
    NotInvertible(f32),
    /// A value vector and its per-entry bindings disagree in length.
    #[error("expected {expected} values, got {actual}")]
    LengthMismatch {
        /// Length required by the binding.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// A linked value vector with no entries.
    #[error("linked value vector is empty")]
    EmptyValues,
    /// Domain bounds that are not finite.
    #[error("domain bounds [{min}, {max}] are not finite")]
    InvalidBounds {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}
