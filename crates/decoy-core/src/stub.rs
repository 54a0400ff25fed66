//! Stub rules and the stub table.
//!
//! Resolution is first-registered-match-wins: rules are tried in the order
//! they were registered and the first rule whose signature and matchers all
//! accept the invocation answers it.

use std::fmt;
use std::sync::Arc;

use decoy_capture::{Matcher, Mode, ModeCell, Value, fire_captors, matches_all};

use crate::error::{DispatchError, Result};
use crate::invocation::Invocation;
use crate::recorder::check_arity;
use crate::signature::FunctionSignature;

/// Computes an answer from the actual arguments.
pub type AnswerFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// What a matched rule does.
#[derive(Clone)]
pub enum Answer {
    /// Returns a fixed value.
    Returns(Value),
    /// Computes the value from the arguments.
    Computes(Arc<AnswerFn>),
    /// Fails the call with the given message.
    Raises(String),
    /// Delegates to the wrapped real instance (spies only).
    CallsThrough,
}

impl Answer {
    /// Creates a computed answer.
    pub fn computes<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::Computes(Arc::new(f))
    }
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Returns(value) => write!(f, "Returns({value})"),
            Self::Computes(_) => f.write_str("Computes(..)"),
            Self::Raises(message) => write!(f, "Raises({message:?})"),
            Self::CallsThrough => f.write_str("CallsThrough"),
        }
    }
}

/// A (signature, matchers, answer) rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct StubRule {
    signature: Arc<FunctionSignature>,
    matchers: Vec<Matcher>,
    answer: Answer,
}

impl StubRule {
    /// Builds a rule; the matcher count must equal the parameter count.
    pub fn new(
        signature: Arc<FunctionSignature>,
        matchers: Vec<Matcher>,
        answer: Answer,
    ) -> Result<Self> {
        check_arity(&signature, matchers.len())?;
        Ok(Self {
            signature,
            matchers,
            answer,
        })
    }

    /// Target signature.
    #[must_use]
    pub fn signature(&self) -> &Arc<FunctionSignature> {
        &self.signature
    }

    /// Per-position matchers.
    #[must_use]
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// The configured answer.
    #[must_use]
    pub const fn answer(&self) -> &Answer {
        &self.answer
    }

    /// Returns true if the rule accepts the invocation. Has no side effects.
    #[must_use]
    pub fn accepts(&self, invocation: &Invocation) -> bool {
        let target = invocation.signature();
        (Arc::ptr_eq(&self.signature, target) || self.signature.same_identity(target))
            && matches_all(&self.matchers, invocation.arguments())
    }
}

/// Ordered rule set of one double.
#[derive(Debug)]
pub struct StubTable {
    rules: ModeCell<Vec<Arc<StubRule>>>,
}

impl StubTable {
    /// Creates an empty table with an explicit mode.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            rules: ModeCell::with_mode(mode, Vec::new()),
        }
    }

    /// Appends a rule; returns its registration index.
    pub fn register(&self, rule: StubRule) -> Result<usize> {
        let signature = rule.signature.to_string();
        let index = self.rules.write(|rules| {
            rules.push(Arc::new(rule));
            rules.len() - 1
        })?;
        tracing::debug!(signature = %signature, index = index, "registered stub rule");
        Ok(index)
    }

    /// Finds the first registered rule accepting `invocation` and fires its
    /// captors. Returns `None` when no rule matches.
    pub fn resolve(&self, invocation: &Invocation) -> Result<Option<Arc<StubRule>>> {
        // Matching runs on a snapshot so answers may re-enter the double.
        let rules = self.rules.read(Clone::clone)?;
        let Some(rule) = rules.into_iter().find(|rule| rule.accepts(invocation)) else {
            return Ok(None);
        };
        fire_captors(&rule.matchers, invocation.arguments())
            .map_err(DispatchError::from)?;
        Ok(Some(rule))
    }

    /// Number of registered rules.
    pub fn len(&self) -> Result<usize> {
        Ok(self.rules.read(Vec::len)?)
    }

    /// Returns true if no rule is registered.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.rules.read(Vec::is_empty)?)
    }

    /// Removes every rule.
    pub fn clear(&self) -> Result<()> {
        Ok(self.rules.write(Vec::clear)?)
    }
}
