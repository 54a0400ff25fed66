//! Thread-safety mode selection.
//!
//! The mode is a process-wide setting that every mode-aware structure reads
//! exactly once, when it is constructed. Changing the mode later only affects
//! structures built afterwards; existing ones keep their original strategy.
//!
//! Install the mode before constructing the first sink or double, or pass it
//! explicitly via the `with_mode` constructors.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};

/// Concurrency strategy for sinks, ledgers and stub tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Reads and writes are mutually exclusive across threads.
    #[default]
    #[serde(alias = "multi_thread", alias = "multi")]
    MultiThread,
    /// Unsynchronized storage confined to the constructing thread.
    #[serde(alias = "single_thread", alias = "single")]
    SingleThread,
}

impl Mode {
    /// Returns the canonical lowercase name of the mode.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MultiThread => "multi-thread",
            Self::SingleThread => "single-thread",
        }
    }

    /// Parses a mode name, accepting `multi-thread`/`multi_thread`/`multi`
    /// and `single-thread`/`single_thread`/`single`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "multi-thread" | "multi" | "multithread" => Some(Self::MultiThread),
            "single-thread" | "single" | "singlethread" => Some(Self::SingleThread),
            _ => None,
        }
    }

    const fn encode(self) -> u8 {
        match self {
            Self::MultiThread => 0,
            Self::SingleThread => 1,
        }
    }

    const fn decode(raw: u8) -> Self {
        match raw {
            1 => Self::SingleThread,
            _ => Self::MultiThread,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

static MODE: AtomicU8 = AtomicU8::new(Mode::MultiThread.encode());

/// Installs the process-wide mode and returns the previous one.
pub fn set_mode(mode: Mode) -> Mode {
    let previous = Mode::decode(MODE.swap(mode.encode(), Ordering::SeqCst));
    if previous != mode {
        tracing::debug!(from = %previous, to = %mode, "thread mode changed");
    }
    previous
}

/// Returns the current process-wide mode.
#[must_use]
pub fn current_mode() -> Mode {
    Mode::decode(MODE.load(Ordering::SeqCst))
}

/// Storage cell whose synchronization strategy is fixed at construction.
///
/// - [`Mode::MultiThread`]: a `parking_lot::Mutex`; every access is exclusive.
/// - [`Mode::SingleThread`]: a `RefCell` owned by the constructing thread.
///   Accesses from any other thread fail with [`CaptureError::ForeignThread`].
///
/// Closures passed to [`read`](Self::read) and [`write`](Self::write) run
/// while the cell is held, so they must not call back into the same cell.
pub struct ModeCell<T> {
    inner: Inner<T>,
}

enum Inner<T> {
    Shared(Mutex<T>),
    Confined(Confined<T>),
}

struct Confined<T> {
    owner: ThreadId,
    cell: RefCell<T>,
}

// SAFETY: `cell` is only borrowed after `check_owner` has confirmed that the
// calling thread is `owner`. ThreadIds are never reused, so at most one
// thread ever reaches the RefCell and it is never accessed concurrently.
// Dropping requires exclusive access and `T: Send`.
#[allow(unsafe_code)]
unsafe impl<T: Send> Sync for Confined<T> {}

impl<T> Confined<T> {
    fn check_owner(&self) -> Result<()> {
        if thread::current().id() == self.owner {
            Ok(())
        } else {
            Err(CaptureError::ForeignThread {
                owner: format!("{:?}", self.owner),
            })
        }
    }
}

impl<T> ModeCell<T> {
    /// Creates a cell using the current process-wide mode.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_mode(current_mode(), value)
    }

    /// Creates a cell with an explicit mode.
    #[must_use]
    pub fn with_mode(mode: Mode, value: T) -> Self {
        let inner = match mode {
            Mode::MultiThread => Inner::Shared(Mutex::new(value)),
            Mode::SingleThread => Inner::Confined(Confined {
                owner: thread::current().id(),
                cell: RefCell::new(value),
            }),
        };
        Self { inner }
    }

    /// Returns the mode this cell was built with.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self.inner {
            Inner::Shared(_) => Mode::MultiThread,
            Inner::Confined(_) => Mode::SingleThread,
        }
    }

    /// Runs `f` with shared access to the contents.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        match &self.inner {
            Inner::Shared(lock) => Ok(f(&lock.lock())),
            Inner::Confined(confined) => {
                confined.check_owner()?;
                let guard = confined.cell.try_borrow().map_err(|_| CaptureError::Busy)?;
                Ok(f(&guard))
            }
        }
    }

    /// Runs `f` with exclusive access to the contents.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        match &self.inner {
            Inner::Shared(lock) => Ok(f(&mut lock.lock())),
            Inner::Confined(confined) => {
                confined.check_owner()?;
                let mut guard = confined
                    .cell
                    .try_borrow_mut()
                    .map_err(|_| CaptureError::Busy)?;
                Ok(f(&mut guard))
            }
        }
    }
}

// Debug never looks inside: a confined cell may be formatted from any thread.
impl<T> std::fmt::Debug for ModeCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeCell").field("mode", &self.mode()).finish_non_exhaustive()
    }
}

impl<T: Default> Default for ModeCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
