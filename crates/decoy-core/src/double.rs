//! Dispatch core shared by every generated double.
//!
//! Generated members call [`DoubleCore::invoke`] (or one of the typed
//! wrappers) with their signature index and packaged arguments. The call is
//! recorded, the stub table is consulted, and the selected answer is executed
//! synchronously on the calling thread. No internal lock is held while an
//! answer or call-through runs.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use decoy_capture::{Matcher, Mode, Value, current_mode};
use serde::{Deserialize, Serialize};

use crate::config::default_verification;
use crate::error::{DispatchError, Result};
use crate::invocation::{InstanceId, Invocation};
use crate::recorder::{InvocationRecorder, VerificationMode};
use crate::signature::FunctionSignature;
use crate::stub::{Answer, StubRule, StubTable};

/// Kind of generated double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubleKind {
    /// No backing instance; unmatched calls fail.
    Mock,
    /// Wraps a real instance; unmatched calls delegate to it.
    Spy,
}

impl DoubleKind {
    /// Suffix appended to the source type name.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Mock => "Mock",
            Self::Spy => "Spy",
        }
    }
}

impl std::fmt::Display for DoubleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::Spy => f.write_str("spy"),
        }
    }
}

/// Result of dispatching one call.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A stub rule produced a value.
    Answered(Value),
    /// The generated member must delegate to the wrapped instance.
    CallThrough,
}

/// Recorder, stub table and signature table of one double instance.
#[derive(Debug)]
pub struct DoubleCore {
    id: InstanceId,
    kind: DoubleKind,
    type_name: String,
    mode: Mode,
    verification: VerificationMode,
    signatures: Vec<Arc<FunctionSignature>>,
    recorder: InvocationRecorder,
    stubs: StubTable,
}

impl DoubleCore {
    /// Creates a core using the process-wide mode and default verification.
    #[must_use]
    pub fn new(
        kind: DoubleKind,
        type_name: impl Into<String>,
        signatures: impl IntoIterator<Item = FunctionSignature>,
    ) -> Self {
        Self::with_mode(kind, type_name, signatures, current_mode())
    }

    /// Creates a full-mock core.
    #[must_use]
    pub fn mock(
        type_name: impl Into<String>,
        signatures: impl IntoIterator<Item = FunctionSignature>,
    ) -> Self {
        Self::new(DoubleKind::Mock, type_name, signatures)
    }

    /// Creates a spy core.
    #[must_use]
    pub fn spy(
        type_name: impl Into<String>,
        signatures: impl IntoIterator<Item = FunctionSignature>,
    ) -> Self {
        Self::new(DoubleKind::Spy, type_name, signatures)
    }

    /// Creates a core with an explicit mode.
    #[must_use]
    pub fn with_mode(
        kind: DoubleKind,
        type_name: impl Into<String>,
        signatures: impl IntoIterator<Item = FunctionSignature>,
        mode: Mode,
    ) -> Self {
        let id = InstanceId::new();
        let type_name = type_name.into();
        let signatures: Vec<_> = signatures.into_iter().map(Arc::new).collect();
        tracing::debug!(
            instance = %id,
            kind = %kind,
            type_name = %type_name,
            members = signatures.len(),
            mode = %mode,
            "created double"
        );
        Self {
            id,
            kind,
            type_name,
            mode,
            verification: default_verification(),
            signatures,
            recorder: InvocationRecorder::new(id, mode),
            stubs: StubTable::new(mode),
        }
    }

    /// Overrides the verification mode used by [`verify`](Self::verify).
    #[must_use]
    pub const fn verification(mut self, mode: VerificationMode) -> Self {
        self.verification = mode;
        self
    }

    /// Instance identity.
    #[must_use]
    pub const fn id(&self) -> InstanceId {
        self.id
    }

    /// Mock or spy.
    #[must_use]
    pub const fn kind(&self) -> DoubleKind {
        self.kind
    }

    /// Name of the generated type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Mode chosen at construction.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Signature table in generation order.
    #[must_use]
    pub fn signatures(&self) -> &[Arc<FunctionSignature>] {
        &self.signatures
    }

    /// Looks up a member by name. Fails if the name is overloaded.
    pub fn signature(&self, name: &str) -> Result<Arc<FunctionSignature>> {
        let mut candidates = self.signatures.iter().filter(|s| s.name == name);
        let Some(first) = candidates.next() else {
            return Err(DispatchError::UnknownSignature(format!(
                "{}::{name}",
                self.type_name
            )));
        };
        let rest: Vec<_> = candidates.collect();
        if rest.is_empty() {
            return Ok(Arc::clone(first));
        }
        Err(DispatchError::AmbiguousSignature {
            name: name.to_string(),
            candidates: std::iter::once(first)
                .chain(rest)
                .map(|s| s.id().to_string())
                .collect(),
        })
    }

    /// Looks up an overload by name and parameter types.
    pub fn overload(&self, name: &str, params: &[&str]) -> Result<Arc<FunctionSignature>> {
        self.signatures
            .iter()
            .find(|s| {
                s.name == name
                    && s.params.len() == params.len()
                    && s.params.iter().zip(params).all(|(p, t)| p.ty == *t)
            })
            .cloned()
            .ok_or_else(|| {
                DispatchError::UnknownSignature(format!("{name}({})", params.join(", ")))
            })
    }

    /// Starts a stub rule for the member called `name`.
    pub fn every(
        &self,
        name: &str,
        matchers: impl IntoIterator<Item = Matcher>,
    ) -> Result<StubBuilder<'_>> {
        let signature = self.signature(name)?;
        self.every_signature(signature, matchers)
    }

    /// Starts a stub rule for an explicit signature.
    pub fn every_signature(
        &self,
        signature: Arc<FunctionSignature>,
        matchers: impl IntoIterator<Item = Matcher>,
    ) -> Result<StubBuilder<'_>> {
        let matchers: Vec<Matcher> = matchers.into_iter().collect();
        crate::recorder::check_arity(&signature, matchers.len())?;
        Ok(StubBuilder {
            core: self,
            signature,
            matchers,
        })
    }

    /// Registers a prepared rule.
    pub fn stub(&self, rule: StubRule) -> Result<()> {
        if matches!(rule.answer(), Answer::CallsThrough) && self.kind == DoubleKind::Mock {
            return Err(DispatchError::NoDelegate {
                signature: rule.signature().to_string(),
            });
        }
        self.stubs.register(rule)?;
        Ok(())
    }

    /// Records and resolves one call of the member at `index`.
    pub fn invoke(&self, index: usize, arguments: Vec<Value>) -> Result<Outcome> {
        let signature = self.signatures.get(index).ok_or_else(|| {
            DispatchError::UnknownSignature(format!("{}#{index}", self.type_name))
        })?;
        crate::recorder::check_arity(signature, arguments.len())?;

        let invocation = self.recorder.record(signature, arguments)?;
        let Some(rule) = self.stubs.resolve(&invocation)? else {
            return self.unmatched(&invocation);
        };

        match rule.answer() {
            Answer::Returns(value) => Ok(Outcome::Answered(value.clone())),
            Answer::Computes(compute) => compute(invocation.arguments()).map(Outcome::Answered),
            Answer::Raises(message) => Err(DispatchError::Raised {
                signature: signature.to_string(),
                message: message.clone(),
            }),
            Answer::CallsThrough => Ok(Outcome::CallThrough),
        }
    }

    fn unmatched(&self, invocation: &Invocation) -> Result<Outcome> {
        match self.kind {
            DoubleKind::Spy => Ok(Outcome::CallThrough),
            DoubleKind::Mock => {
                let signature = invocation.signature().to_string();
                tracing::warn!(
                    instance = %self.id,
                    signature = %signature,
                    sequence = invocation.sequence(),
                    "unstubbed call on mock"
                );
                Err(DispatchError::Unstubbed {
                    signature,
                    arguments: invocation.argument_reprs(),
                })
            }
        }
    }

    /// Dispatches a call on a mock and converts the answer to `T`.
    pub fn dispatch<T: Any + Clone>(&self, index: usize, arguments: Vec<Value>) -> Result<T> {
        match self.invoke(index, arguments)? {
            Outcome::Answered(value) => self.convert(index, &value),
            Outcome::CallThrough => Err(DispatchError::NoDelegate {
                signature: self.describe(index),
            }),
        }
    }

    /// Dispatches a call and runs `call_through` when the double delegates.
    pub fn dispatch_or<T, F>(
        &self,
        index: usize,
        arguments: Vec<Value>,
        call_through: F,
    ) -> Result<T>
    where
        T: Any + Clone,
        F: FnOnce() -> T,
    {
        match self.invoke(index, arguments)? {
            Outcome::Answered(value) => self.convert(index, &value),
            Outcome::CallThrough => Ok(call_through()),
        }
    }

    /// Converts an answered value to the member's return type.
    pub fn convert<T: Any + Clone>(&self, index: usize, value: &Value) -> Result<T> {
        value.take::<T>().map_err(|source| DispatchError::ReturnType {
            signature: self.describe(index),
            source,
        })
    }

    fn describe(&self, index: usize) -> String {
        self.signatures
            .get(index)
            .map_or_else(|| format!("#{index}"), |s| s.to_string())
    }

    /// Calls of `name` whose arguments satisfy `matchers`, in call order.
    /// Bound captors fire once per match.
    pub fn matching_invocations(
        &self,
        name: &str,
        matchers: impl IntoIterator<Item = Matcher>,
    ) -> Result<Vec<Invocation>> {
        let signature = self.signature(name)?;
        self.recorder
            .matching_invocations(&signature, &matchers.into_iter().collect::<Vec<_>>())
    }

    /// Verifies `name` against the double's default verification mode.
    pub fn verify(
        &self,
        name: &str,
        matchers: impl IntoIterator<Item = Matcher>,
    ) -> Result<Vec<Invocation>> {
        self.verify_with(name, matchers, self.verification)
    }

    /// Verifies `name` against an explicit verification mode.
    pub fn verify_with(
        &self,
        name: &str,
        matchers: impl IntoIterator<Item = Matcher>,
        mode: VerificationMode,
    ) -> Result<Vec<Invocation>> {
        let signature = self.signature(name)?;
        let matchers: Vec<Matcher> = matchers.into_iter().collect();
        self.recorder.verify(&signature, &matchers, mode)
    }

    /// Verifies an explicit signature.
    pub fn verify_signature(
        &self,
        signature: &FunctionSignature,
        matchers: &[Matcher],
        mode: VerificationMode,
    ) -> Result<Vec<Invocation>> {
        self.recorder.verify(signature, matchers, mode)
    }

    /// Snapshot of the whole ledger.
    pub fn invocations(&self) -> Result<Vec<Invocation>> {
        self.recorder.invocations()
    }

    /// Drops recorded calls and stub rules.
    pub fn reset(&self) -> Result<()> {
        self.recorder.clear()?;
        self.stubs.clear()?;
        tracing::debug!(instance = %self.id, "reset double");
        Ok(())
    }
}

/// Fluent stub registration returned by [`DoubleCore::every`].
#[must_use = "a stub is only registered once an answer is chosen"]
pub struct StubBuilder<'a> {
    core: &'a DoubleCore,
    signature: Arc<FunctionSignature>,
    matchers: Vec<Matcher>,
}

impl StubBuilder<'_> {
    /// Answers with a fixed value.
    pub fn returns<T>(self, value: T) -> Result<()>
    where
        T: Any + Send + Sync + Debug,
    {
        self.answer(Answer::Returns(Value::new(value)))
    }

    /// Answers with a value computed from the arguments.
    pub fn answers<F>(self, f: F) -> Result<()>
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.answer(Answer::computes(f))
    }

    /// Fails matching calls with `message`.
    pub fn raises(self, message: impl Into<String>) -> Result<()> {
        self.answer(Answer::Raises(message.into()))
    }

    /// Delegates matching calls to the wrapped instance (spies only).
    pub fn calls_through(self) -> Result<()> {
        self.answer(Answer::CallsThrough)
    }

    /// Registers the rule with an explicit answer.
    pub fn answer(self, answer: Answer) -> Result<()> {
        let rule = StubRule::new(self.signature, self.matchers, answer)?;
        self.core.stub(rule)
    }
}
