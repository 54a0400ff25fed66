// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # decoy-capture
//!
//! Capture and matcher runtime for decoy test doubles.
//!
//! This crate is the leaf of the decoy workspace and provides:
//!
//! - [`Value`]: type-erased argument and answer handle
//! - [`Slot`] and [`CapturedList`]: typed capture sinks
//! - [`Matcher`]: argument predicates ([`any`], [`eq`], [`capture`], [`capture_list`])
//! - [`Mode`]: process-wide thread-safety strategy, read once per construction
//! - [`ModeCell`]: the storage cell every mode-aware structure is built on
//!
//! ## Example
//!
//! ```rust
//! use decoy_capture::{Slot, Value, capture, matches_all, fire_captors};
//!
//! let slot = Slot::<String>::new();
//! let matchers = [capture(&slot)];
//! let args = [Value::new("bob".to_string())];
//!
//! assert!(matches_all(&matchers, &args));
//! fire_captors(&matchers, &args).unwrap();
//! assert_eq!(slot.get().unwrap().as_deref(), Some("bob"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod matcher;
pub mod mode;
pub mod sink;
pub mod value;

pub use error::{CaptureError, Result};
pub use matcher::{Matcher, any, capture, capture_list, eq, fire_captors, matches_all};
pub use mode::{Mode, ModeCell, current_mode, set_mode};
pub use sink::{Captureable, CapturedList, Slot};
pub use value::Value;
