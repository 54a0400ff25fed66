//! Error types for decoy-gen.
//!
//! Member and type failures are collected into reports and never abort a
//! generation run; only configuration and I/O failures are fatal.

use std::fmt;

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenError>;

/// Why a member cannot be proxied by a generated double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// The member cannot be overridden.
    Final,
    /// The member has no receiver (static or associated function).
    NoReceiver,
    /// The member declares its own type parameters.
    Generic(Vec<String>),
    /// The member returns a borrow, which an erased answer cannot produce.
    BorrowedReturn(String),
    /// Another member of the double already uses this name.
    Overloaded(String),
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Final => f.write_str("member is final"),
            Self::NoReceiver => f.write_str("member has no receiver"),
            Self::Generic(params) => {
                write!(f, "member declares type parameters <{}>", params.join(", "))
            }
            Self::BorrowedReturn(ty) => write!(f, "member returns a borrow ({ty})"),
            Self::Overloaded(id) => write!(f, "member name is overloaded ({id})"),
        }
    }
}

/// Errors raised while mining, generating or emitting doubles.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// A member cannot be proxied.
    #[error("unsupported member {type_name}::{member}: {reason}")]
    UnsupportedMember {
        /// Type declaring the member.
        type_name: String,
        /// Member name.
        member: String,
        /// Rejection reason.
        reason: UnsupportedReason,
    },

    /// The backend already holds an artifact with this name.
    #[error("artifact already exists: {name}")]
    DuplicateArtifact {
        /// Generated type name.
        name: String,
    },

    /// Two different types map to the same artifact.
    #[error("artifact {stem} is claimed by both {first} and {second}")]
    NameClash {
        /// Artifact stem both types map to.
        stem: String,
        /// Type generated first.
        first: String,
        /// Type requested second.
        second: String,
    },

    /// A type name could not be resolved against the loaded descriptors.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Descriptor or report (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GenError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an unsupported-member error.
    #[must_use]
    pub fn unsupported(
        type_name: impl Into<String>,
        member: impl Into<String>,
        reason: UnsupportedReason,
    ) -> Self {
        Self::UnsupportedMember {
            type_name: type_name.into(),
            member: member.into(),
            reason,
        }
    }

    /// Returns true for the duplicate-artifact error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateArtifact { .. })
    }
}

impl From<serde_json::Error> for GenError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
