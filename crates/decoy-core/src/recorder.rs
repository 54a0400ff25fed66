//! Invocation ledger and verification.
//!
//! Sequence numbers are allocated while the ledger is held for writing, so
//! the ledger is always in sequence order, even when several threads call the
//! same double. Verification walks a snapshot of the ledger; captors bound in
//! a query fire once per matching invocation, in sequence order.

use std::sync::Arc;

use decoy_capture::{Matcher, Mode, ModeCell, Value, fire_captors, matches_all};
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, Result};
use crate::invocation::{InstanceId, Invocation, next_sequence};
use crate::signature::FunctionSignature;

/// How many matching calls a verification query expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// Exactly `n` matching calls.
    Exactly(usize),
    /// At least `n` matching calls.
    AtLeast(usize),
    /// At most `n` matching calls.
    AtMost(usize),
    /// No matching calls.
    Never,
}

impl VerificationMode {
    /// Returns true if `count` satisfies the mode.
    #[must_use]
    pub const fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::AtMost(n) => count <= n,
            Self::Never => count == 0,
        }
    }
}

impl Default for VerificationMode {
    fn default() -> Self {
        Self::Exactly(1)
    }
}

impl std::fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
            Self::AtMost(n) => write!(f, "at most {n}"),
            Self::Never => f.write_str("never"),
        }
    }
}

/// Append-only ledger of calls on one double.
#[derive(Debug)]
pub struct InvocationRecorder {
    instance: InstanceId,
    ledger: ModeCell<Vec<Invocation>>,
}

impl InvocationRecorder {
    /// Creates an empty recorder with an explicit mode.
    #[must_use]
    pub fn new(instance: InstanceId, mode: Mode) -> Self {
        Self {
            instance,
            ledger: ModeCell::with_mode(mode, Vec::new()),
        }
    }

    /// Appends a call and returns the recorded invocation.
    pub fn record(
        &self,
        signature: &Arc<FunctionSignature>,
        arguments: Vec<Value>,
    ) -> Result<Invocation> {
        let invocation = self.ledger.write(|ledger| {
            let invocation = Invocation::new(
                self.instance,
                Arc::clone(signature),
                arguments,
                next_sequence(),
            );
            ledger.push(invocation.clone());
            invocation
        })?;
        tracing::debug!(
            instance = %self.instance,
            signature = %signature,
            sequence = invocation.sequence(),
            "recorded invocation"
        );
        Ok(invocation)
    }

    /// Snapshot of every recorded call, in sequence order.
    pub fn invocations(&self) -> Result<Vec<Invocation>> {
        Ok(self.ledger.read(Clone::clone)?)
    }

    /// Snapshot of the calls of one signature, in sequence order.
    pub fn invocations_of(&self, signature: &FunctionSignature) -> Result<Vec<Invocation>> {
        Ok(self.ledger.read(|ledger| {
            ledger
                .iter()
                .filter(|inv| inv.signature().same_identity(signature))
                .cloned()
                .collect()
        })?)
    }

    /// Returns the calls of `signature` whose arguments satisfy `matchers`,
    /// firing bound captors once per match.
    pub fn matching_invocations(
        &self,
        signature: &FunctionSignature,
        matchers: &[Matcher],
    ) -> Result<Vec<Invocation>> {
        check_arity(signature, matchers.len())?;
        let candidates = self.invocations_of(signature)?;
        let mut matched = Vec::new();
        for invocation in candidates {
            if matches_all(matchers, invocation.arguments()) {
                fire_captors(matchers, invocation.arguments())?;
                matched.push(invocation);
            }
        }
        Ok(matched)
    }

    /// Checks the number of matching calls against `mode`.
    pub fn verify(
        &self,
        signature: &FunctionSignature,
        matchers: &[Matcher],
        mode: VerificationMode,
    ) -> Result<Vec<Invocation>> {
        let matched = self.matching_invocations(signature, matchers)?;
        if mode.accepts(matched.len()) {
            return Ok(matched);
        }
        let recorded = self
            .invocations_of(signature)?
            .iter()
            .map(ToString::to_string)
            .collect();
        Err(DispatchError::Verification {
            signature: signature.to_string(),
            expected: mode,
            actual: matched.len(),
            recorded,
        })
    }

    /// Number of recorded calls.
    pub fn len(&self) -> Result<usize> {
        Ok(self.ledger.read(Vec::len)?)
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.ledger.read(Vec::is_empty)?)
    }

    /// Drops every recorded call.
    pub fn clear(&self) -> Result<()> {
        Ok(self.ledger.write(Vec::clear)?)
    }
}

pub(crate) fn check_arity(signature: &FunctionSignature, actual: usize) -> Result<()> {
    if signature.arity() == actual {
        Ok(())
    } else {
        Err(DispatchError::ArityMismatch {
            signature: signature.to_string(),
            expected: signature.arity(),
            actual,
        })
    }
}
