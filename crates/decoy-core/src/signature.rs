//! Canonical signature model.
//!
//! A [`FunctionSignature`] is identified by its name and parameter types
//! ([`SignatureId`]); return type and modifiers do not take part in identity.

use serde::{Deserialize, Serialize};

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name as declared.
    pub name: String,
    /// Parameter type, rendered as source text.
    pub ty: String,
}

impl Param {
    /// Creates a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Returns true if the parameter is passed by reference.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        self.ty.trim_start().starts_with('&')
    }
}

/// How the receiver is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    /// `&self`
    #[default]
    Ref,
    /// `&mut self`
    Mut,
}

/// Property accessor role of a normalized member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessor {
    /// Reads the property.
    Getter,
    /// Writes the property.
    Setter,
}

/// Signature modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Asynchronous (suspending) member.
    #[serde(default)]
    pub is_async: bool,
    /// Set when the member was normalized from a property.
    #[serde(default)]
    pub accessor: Option<Accessor>,
    /// Receiver mutability.
    #[serde(default)]
    pub receiver: Receiver,
}

/// Overload identity: name plus ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignatureId {
    /// Member name.
    pub name: String,
    /// Ordered parameter types.
    pub params: Vec<String>,
}

impl std::fmt::Display for SignatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// A callable member of a mocked type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// Member name.
    pub name: String,
    /// Ordered parameters.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return type as source text; empty means unit.
    #[serde(default)]
    pub return_type: String,
    /// Modifiers.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Fully-qualified name of the type that declared the member.
    #[serde(default)]
    pub origin: String,
}

impl FunctionSignature {
    /// Creates a signature with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: return_type.into(),
            modifiers: Modifiers::default(),
            origin: String::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    /// Sets the declaring type.
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Marks the member as asynchronous.
    #[must_use]
    pub const fn asynchronous(mut self) -> Self {
        self.modifiers.is_async = true;
        self
    }

    /// Marks the member as a property accessor.
    #[must_use]
    pub const fn accessor(mut self, accessor: Accessor) -> Self {
        self.modifiers.accessor = Some(accessor);
        self
    }

    /// Marks the receiver as `&mut self`.
    #[must_use]
    pub const fn mutable_receiver(mut self) -> Self {
        self.modifiers.receiver = Receiver::Mut;
        self
    }

    /// Returns the overload identity.
    #[must_use]
    pub fn id(&self) -> SignatureId {
        SignatureId {
            name: self.name.clone(),
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
        }
    }

    /// Compares identity without allocating.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self.params.iter().zip(&other.params).all(|(a, b)| a.ty == b.ty)
    }

    /// Compares against an explicit identity.
    #[must_use]
    pub fn has_id(&self, id: &SignatureId) -> bool {
        self.name == id.name
            && self.params.len() == id.params.len()
            && self.params.iter().zip(&id.params).all(|(a, b)| &a.ty == b)
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the member returns unit.
    #[must_use]
    pub fn returns_unit(&self) -> bool {
        let ty = self.return_type.trim();
        ty.is_empty() || ty == "()"
    }
}

impl std::fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.is_async {
            f.write_str("async ")?;
        }
        let params: Vec<&str> = self.params.iter().map(|p| p.ty.as_str()).collect();
        write!(f, "{}({})", self.name, params.join(", "))?;
        if !self.returns_unit() {
            write!(f, " -> {}", self.return_type.trim())?;
        }
        Ok(())
    }
}
