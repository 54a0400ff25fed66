//! Recorded invocations.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use decoy_capture::Value;
use serde::{Deserialize, Serialize};

use crate::signature::FunctionSignature;

/// Unique identifier for a double instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(uuid::Uuid);

impl InstanceId {
    /// Creates a new random instance ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Process-wide; 0 is never handed out.
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Allocates the next process-unique sequence number.
pub(crate) fn next_sequence() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::SeqCst)
}

/// A single call on a double. Immutable once recorded.
#[derive(Debug, Clone)]
pub struct Invocation {
    signature: Arc<FunctionSignature>,
    arguments: Vec<Value>,
    sequence: u64,
    instance: InstanceId,
}

impl Invocation {
    pub(crate) fn new(
        instance: InstanceId,
        signature: Arc<FunctionSignature>,
        arguments: Vec<Value>,
        sequence: u64,
    ) -> Self {
        Self {
            signature,
            arguments,
            sequence,
            instance,
        }
    }

    /// The invoked signature.
    #[must_use]
    pub fn signature(&self) -> &Arc<FunctionSignature> {
        &self.signature
    }

    /// Arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Process-unique, strictly increasing sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The double this call was made on.
    #[must_use]
    pub const fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Debug renderings of the arguments.
    #[must_use]
    pub fn argument_reprs(&self) -> Vec<String> {
        self.arguments.iter().map(|a| a.repr().to_string()).collect()
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {}({})",
            self.sequence,
            self.signature.name,
            self.argument_reprs().join(", ")
        )
    }
}
