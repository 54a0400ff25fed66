//! Capture sinks.
//!
//! A [`Slot`] keeps the most recently stored value; a [`CapturedList`] keeps
//! every stored value in insertion order. Both pick their storage strategy
//! from the [`Mode`] in effect when they are constructed and keep it for life.
//! Clones share the same storage.

use std::any::{Any, type_name};
use std::sync::Arc;

use crate::error::{CaptureError, Result};
use crate::mode::{Mode, ModeCell};
use crate::value::Value;

/// A sink that captured argument values can be stored into.
pub trait Captureable: Send + Sync {
    /// Stores an erased value, checking it against the sink's element type.
    fn store_captured_value(&self, value: &Value) -> Result<()>;

    /// Returns true if `value` holds the sink's element type.
    fn accepts(&self, value: &Value) -> bool;

    /// Name of the sink's declared element type.
    fn element_type(&self) -> &'static str;
}

fn downcast<T: Any + Clone>(value: &Value) -> Result<T> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| CaptureError::type_mismatch(type_name::<T>(), value.type_name()))
}

/// Single-value capture sink. Every store overwrites the previous value.
///
/// Usage: bind with [`capture`](crate::capture), verify, then read with [`Slot::get`].
pub struct Slot<T> {
    cell: Arc<ModeCell<Option<T>>>,
}

impl<T: Clone + Send + 'static> Slot<T> {
    /// Creates an empty slot using the current process-wide mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: Arc::new(ModeCell::new(None)),
        }
    }

    /// Creates an empty slot with an explicit mode.
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            cell: Arc::new(ModeCell::with_mode(mode, None)),
        }
    }

    /// Returns the mode chosen at construction.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.cell.mode()
    }

    /// Overwrites the captured value.
    pub fn store(&self, value: T) -> Result<()> {
        self.cell.write(|slot| *slot = Some(value))
    }

    /// Returns the most recently captured value, or `None` if nothing was stored.
    pub fn get(&self) -> Result<Option<T>> {
        self.cell.read(Clone::clone)
    }

    /// Returns true if nothing has been captured yet.
    pub fn is_empty(&self) -> Result<bool> {
        self.cell.read(Option::is_none)
    }
}

impl<T: Clone + Send + 'static> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> std::fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("element", &type_name::<T>())
            .field("mode", &self.cell.mode())
            .finish()
    }
}

impl<T: Clone + Send + 'static> Captureable for Slot<T> {
    fn store_captured_value(&self, value: &Value) -> Result<()> {
        self.store(downcast::<T>(value)?)
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is::<T>()
    }

    fn element_type(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Ordered, append-only capture sink.
pub struct CapturedList<T> {
    cell: Arc<ModeCell<Vec<T>>>,
}

impl<T: Clone + Send + 'static> CapturedList<T> {
    /// Creates an empty list using the current process-wide mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: Arc::new(ModeCell::new(Vec::new())),
        }
    }

    /// Creates an empty list with an explicit mode.
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            cell: Arc::new(ModeCell::with_mode(mode, Vec::new())),
        }
    }

    /// Returns the mode chosen at construction.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.cell.mode()
    }

    /// Appends a captured value.
    pub fn store(&self, value: T) -> Result<()> {
        self.cell.write(|list| list.push(value))
    }

    /// Returns a snapshot of every captured value in insertion order.
    pub fn get(&self) -> Result<Vec<T>> {
        self.cell.read(Clone::clone)
    }

    /// Number of captured values.
    pub fn len(&self) -> Result<usize> {
        self.cell.read(Vec::len)
    }

    /// Returns true if nothing has been captured yet.
    pub fn is_empty(&self) -> Result<bool> {
        self.cell.read(Vec::is_empty)
    }
}

impl<T: Clone + Send + 'static> Default for CapturedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CapturedList<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> std::fmt::Debug for CapturedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedList")
            .field("element", &type_name::<T>())
            .field("mode", &self.cell.mode())
            .finish()
    }
}

impl<T: Clone + Send + 'static> Captureable for CapturedList<T> {
    fn store_captured_value(&self, value: &Value) -> Result<()> {
        self.store(downcast::<T>(value)?)
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is::<T>()
    }

    fn element_type(&self) -> &'static str {
        type_name::<T>()
    }
}
