//! Error types for decoy-core.
//!
//! Runtime dispatch errors are always returned to the caller. An unstubbed
//! call on a mock never degrades into a default value.

use decoy_capture::CaptureError;

use crate::recorder::VerificationMode;

/// Result type alias for dispatch and verification operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors raised while stubbing, dispatching or verifying a double.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No stub rule matched a call on a full mock.
    #[error("unstubbed call: {signature} with arguments [{}]", .arguments.join(", "))]
    Unstubbed {
        /// The invoked signature.
        signature: String,
        /// Debug renderings of the received arguments, in declaration order.
        arguments: Vec<String>,
    },

    /// A stub rule answered with an error.
    #[error("stubbed error from {signature}: {message}")]
    Raised {
        /// The invoked signature.
        signature: String,
        /// The configured message.
        message: String,
    },

    /// A call-through answer was selected on a double without a delegate.
    #[error("no delegate to call through for {signature}")]
    NoDelegate {
        /// The invoked signature.
        signature: String,
    },

    /// Matcher or argument count differs from the signature's parameter count.
    #[error("arity mismatch for {signature}: expected {expected}, got {actual}")]
    ArityMismatch {
        /// The targeted signature.
        signature: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied matcher or argument count.
        actual: usize,
    },

    /// No signature with that name (or index) exists on the double.
    #[error("unknown signature: {0}")]
    UnknownSignature(String),

    /// A name lookup matched several overloads.
    #[error("ambiguous signature {name}: candidates {}", .candidates.join(", "))]
    AmbiguousSignature {
        /// The requested name.
        name: String,
        /// Every overload carrying that name.
        candidates: Vec<String>,
    },

    /// An answer could not be converted to the member's return type.
    #[error("return type mismatch for {signature}: {source}")]
    ReturnType {
        /// The invoked signature.
        signature: String,
        /// Underlying conversion failure.
        #[source]
        source: CaptureError,
    },

    /// A verification query did not see the expected number of calls.
    #[error(
        "verification failed for {signature}: expected {expected}, found {actual} (recorded: [{}])",
        .recorded.join(", ")
    )]
    Verification {
        /// The verified signature.
        signature: String,
        /// The requested verification mode.
        expected: VerificationMode,
        /// Number of matching invocations.
        actual: usize,
        /// Every recorded call of the signature, matching or not.
        recorded: Vec<String>,
    },

    /// Capture sink or storage cell failure.
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DispatchError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true for the unstubbed-call error.
    #[must_use]
    pub const fn is_unstubbed(&self) -> bool {
        matches!(self, Self::Unstubbed { .. })
    }

    /// Returns true if the error reflects a misconfigured test rather than
    /// behaviour of the code under test.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::ArityMismatch { .. }
                | Self::UnknownSignature(_)
                | Self::AmbiguousSignature { .. }
                | Self::NoDelegate { .. }
        )
    }
}
