//! Argument matchers.
//!
//! Matching is two-phase: [`matches_all`] decides whether every position
//! matches, and only then does [`fire_captors`] push the actual arguments into
//! bound sinks. A captor therefore stores exactly once per successful match and
//! never on a failed attempt.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{CaptureError, Result};
use crate::sink::{Captureable, CapturedList, Slot};
use crate::value::Value;

/// Predicate applied to one argument position.
#[derive(Clone)]
pub enum Matcher {
    /// Wildcard: always matches, never touches a sink.
    Any,
    /// Matches arguments equal to the expected value.
    Exact(Exact),
    /// Always matches; stores the argument into its sink once the whole
    /// invocation has matched.
    Captor(Captor),
}

/// Expected value plus the equality used to compare it.
#[derive(Clone)]
pub struct Exact {
    expected: Value,
    eq: fn(&Value, &Value) -> bool,
}

/// Capture binding for a [`Slot`] or [`CapturedList`].
#[derive(Clone)]
pub struct Captor {
    sink: Arc<dyn Captureable>,
}

fn typed_eq<T: PartialEq + Any>(expected: &Value, actual: &Value) -> bool {
    match (expected.downcast_ref::<T>(), actual.downcast_ref::<T>()) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

impl Matcher {
    /// Returns true if `actual` satisfies this matcher.
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Any | Self::Captor(_) => true,
            Self::Exact(exact) => (exact.eq)(&exact.expected, actual),
        }
    }

    /// Checks that a captor can store `actual` without storing it.
    pub fn check(&self, actual: &Value) -> Result<()> {
        match self {
            Self::Captor(captor) if !captor.sink.accepts(actual) => Err(
                CaptureError::type_mismatch(captor.sink.element_type(), actual.type_name()),
            ),
            _ => Ok(()),
        }
    }

    /// Performs the matcher's side effect for a matched argument.
    pub fn fire(&self, actual: &Value) -> Result<()> {
        match self {
            Self::Captor(captor) => captor.sink.store_captured_value(actual),
            Self::Any | Self::Exact(_) => Ok(()),
        }
    }

    /// Returns true if this matcher stores into a sink.
    #[must_use]
    pub const fn is_captor(&self) -> bool {
        matches!(self, Self::Captor(_))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any()"),
            Self::Exact(exact) => write!(f, "eq({})", exact.expected),
            Self::Captor(captor) => write!(f, "capture<{}>", captor.sink.element_type()),
        }
    }
}

/// Wildcard matcher.
#[must_use]
pub const fn any() -> Matcher {
    Matcher::Any
}

/// Exact-value matcher.
#[must_use]
pub fn eq<T>(expected: T) -> Matcher
where
    T: PartialEq + Any + Send + Sync + fmt::Debug,
{
    Matcher::Exact(Exact {
        expected: Value::new(expected),
        eq: typed_eq::<T>,
    })
}

/// Captor bound to a [`Slot`].
#[must_use]
pub fn capture<T: Clone + Send + 'static>(slot: &Slot<T>) -> Matcher {
    Matcher::Captor(Captor {
        sink: Arc::new(slot.clone()),
    })
}

/// Captor bound to a [`CapturedList`].
#[must_use]
pub fn capture_list<T: Clone + Send + 'static>(list: &CapturedList<T>) -> Matcher {
    Matcher::Captor(Captor {
        sink: Arc::new(list.clone()),
    })
}

/// Returns true if the argument count equals the matcher count and every
/// matcher accepts the argument at its position.
#[must_use]
pub fn matches_all(matchers: &[Matcher], args: &[Value]) -> bool {
    matchers.len() == args.len() && matchers.iter().zip(args).all(|(m, a)| m.matches(a))
}

/// Fires every captor in parameter order. Call only after [`matches_all`].
///
/// Every captor's element type is checked first; on a mismatch no sink is
/// touched.
pub fn fire_captors(matchers: &[Matcher], args: &[Value]) -> Result<()> {
    for (matcher, arg) in matchers.iter().zip(args) {
        matcher.check(arg)?;
    }
    for (matcher, arg) in matchers.iter().zip(args) {
        matcher.fire(arg)?;
    }
    Ok(())
}
