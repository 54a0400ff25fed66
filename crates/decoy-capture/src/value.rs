//! Type-erased argument and answer values.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{CaptureError, Result};

/// A type-erased, cheaply clonable value.
///
/// Arguments recorded by a double and answers returned from stubs travel as
/// `Value`s. Each value remembers its concrete type and a `Debug` rendering
/// taken at construction, so error messages can name the received arguments
/// without knowing their types.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
    repr: Arc<str>,
}

impl Value {
    /// Wraps a concrete value.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        let repr: Arc<str> = format!("{value:?}").into();
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            repr,
        }
    }

    /// The unit value, returned by members without a result.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Returns the concrete type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the concrete type id.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns true if the value holds a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Borrows the value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clones the value out as `T`.
    pub fn take<T: Any + Clone>(&self) -> Result<T> {
        self.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| CaptureError::type_mismatch(type_name::<T>(), self.type_name))
    }

    /// Returns the `Debug` rendering captured at construction.
    #[must_use]
    pub fn repr(&self) -> &str {
        &self.repr
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}
