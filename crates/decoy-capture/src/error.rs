//! Error types for decoy-capture.

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors raised by capture sinks and mode-selected storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// A value of the wrong runtime type was stored into a typed sink,
    /// or an erased value was taken out as the wrong type.
    #[error("capture type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The sink's declared element type.
        expected: &'static str,
        /// The runtime type of the offered value.
        actual: &'static str,
    },

    /// A single-thread cell was touched from a thread other than its owner.
    #[error("single-thread storage accessed from a foreign thread (owner: {owner})")]
    ForeignThread {
        /// Debug rendering of the owning thread id.
        owner: String,
    },

    /// A single-thread cell was borrowed re-entrantly.
    #[error("single-thread storage is already borrowed")]
    Busy,
}

impl CaptureError {
    /// Creates a type mismatch error.
    #[must_use]
    pub const fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Returns true if this error signals type confusion at a capture site.
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}
