// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # decoy-core
//!
//! Runtime half of the decoy test-double framework.
//!
//! - [`FunctionSignature`]: canonical member model shared with the generator
//! - [`InvocationRecorder`]: per-instance call ledger and verification
//! - [`StubTable`]: ordered stub rules, first registered match wins
//! - [`DoubleCore`]: the dispatch path every generated mock and spy calls into
//! - [`RuntimeConfig`]: process-wide mode and verification defaults
//!
//! ## Example
//!
//! ```rust
//! use decoy_capture::{Slot, Value, any, capture};
//! use decoy_core::{DoubleCore, FunctionSignature};
//!
//! let core = DoubleCore::mock(
//!     "GreeterMock",
//!     [FunctionSignature::new("greet", "String").param("name", "String")],
//! );
//! core.every("greet", [any()]).unwrap().returns("hi".to_string()).unwrap();
//!
//! let answer: String = core.dispatch(0, vec![Value::new("bob".to_string())]).unwrap();
//! assert_eq!(answer, "hi");
//!
//! let slot = Slot::<String>::new();
//! core.verify("greet", [capture(&slot)]).unwrap();
//! assert_eq!(slot.get().unwrap().as_deref(), Some("bob"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod double;
pub mod error;
pub mod invocation;
pub mod recorder;
pub mod signature;
pub mod stub;

pub use decoy_capture::{Matcher, Mode, Value};

pub use config::{MODE_ENV, RuntimeConfig, default_verification, set_default_verification};
pub use double::{DoubleCore, DoubleKind, Outcome, StubBuilder};
pub use error::{DispatchError, Result};
pub use invocation::{InstanceId, Invocation};
pub use recorder::{InvocationRecorder, VerificationMode};
pub use signature::{Accessor, FunctionSignature, Modifiers, Param, Receiver, SignatureId};
pub use stub::{Answer, AnswerFn, StubRule, StubTable};
