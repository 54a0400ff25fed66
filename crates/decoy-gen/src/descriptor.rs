//! Type descriptors.
//!
//! The generator never inspects source code itself. A front-end describes each
//! type through [`TypeDescriptor`]; [`DescriptorSet`] is the serde-backed
//! implementation read from `descriptors.json`.

use std::collections::HashMap;
use std::path::Path;

use decoy_core::{Param, Receiver};
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};

/// Read-only view of a type's declared surface.
pub trait TypeDescriptor {
    /// Fully-qualified name, e.g. `app::Greeter`.
    fn qualified_name(&self) -> &str;

    /// Members declared directly on this type, in declaration order.
    fn members(&self) -> &[MemberDecl];

    /// Direct ancestors, in declaration order.
    fn ancestors(&self) -> Vec<Box<dyn TypeDescriptor + '_>>;

    /// Last path segment of the qualified name.
    fn simple_name(&self) -> &str {
        let name = self.qualified_name();
        name.rsplit("::").next().unwrap_or(name)
    }
}

const fn yes() -> bool {
    true
}

/// A declared function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Member name.
    pub name: String,
    /// Ordered parameters, receiver excluded.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Return type as source text; empty means unit.
    #[serde(default)]
    pub return_type: String,
    /// Asynchronous member.
    #[serde(default)]
    pub is_async: bool,
    /// Cannot be overridden.
    #[serde(default)]
    pub is_final: bool,
    /// False for static and associated functions.
    #[serde(default = "yes")]
    pub has_receiver: bool,
    /// Receiver mutability.
    #[serde(default)]
    pub receiver: Receiver,
    /// Type parameters declared by the member itself.
    #[serde(default)]
    pub generics: Vec<String>,
}

impl FunctionDecl {
    /// Creates a `&self` function with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: return_type.into(),
            is_async: false,
            is_final: false,
            has_receiver: true,
            receiver: Receiver::Ref,
            generics: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }
}

/// A declared property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Property name.
    pub name: String,
    /// Property type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Writable property; adds a setter.
    #[serde(default)]
    pub mutable: bool,
    /// Cannot be overridden.
    #[serde(default)]
    pub is_final: bool,
    /// False for static properties.
    #[serde(default = "yes")]
    pub has_receiver: bool,
}

/// A declared member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberDecl {
    /// Function member.
    Function(FunctionDecl),
    /// Property member.
    Property(PropertyDecl),
}

impl MemberDecl {
    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(f) => &f.name,
            Self::Property(p) => &p.name,
        }
    }
}

impl From<FunctionDecl> for MemberDecl {
    fn from(decl: FunctionDecl) -> Self {
        Self::Function(decl)
    }
}

impl From<PropertyDecl> for MemberDecl {
    fn from(decl: PropertyDecl) -> Self {
        Self::Property(decl)
    }
}

/// One serialized type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully-qualified name.
    pub name: String,
    /// Qualified names of direct ancestors.
    #[serde(default)]
    pub ancestors: Vec<String>,
    /// Declared members.
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

impl TypeDecl {
    /// Creates a declaration without members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Adds an ancestor.
    #[must_use]
    pub fn extends(mut self, ancestor: impl Into<String>) -> Self {
        self.ancestors.push(ancestor.into());
        self
    }

    /// Adds a member.
    #[must_use]
    pub fn member(mut self, member: impl Into<MemberDecl>) -> Self {
        self.members.push(member.into());
        self
    }
}

/// All declarations handed over by a front-end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorSet {
    types: Vec<TypeDecl>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl DescriptorSet {
    /// Builds a set and checks that every ancestor resolves.
    ///
    /// Repeated identical declarations of one type collapse into one; two
    /// declarations of one name that differ are a configuration error.
    pub fn new(declared: Vec<TypeDecl>) -> Result<Self> {
        let mut index = HashMap::with_capacity(declared.len());
        let mut types: Vec<TypeDecl> = Vec::with_capacity(declared.len());
        for decl in declared {
            match index.get(&decl.name).and_then(|&i| types.get(i)) {
                Some(first) if *first == decl => {
                    tracing::info!(type_name = %decl.name, "dropping repeated declaration");
                }
                Some(_) => {
                    return Err(GenError::config(format!(
                        "conflicting declarations of {}",
                        decl.name
                    )));
                }
                None => {
                    index.insert(decl.name.clone(), types.len());
                    types.push(decl);
                }
            }
        }
        for decl in &types {
            if let Some(missing) = decl.ancestors.iter().find(|a| !index.contains_key(*a)) {
                return Err(GenError::UnknownType(format!(
                    "{missing} (ancestor of {})",
                    decl.name
                )));
            }
        }
        Ok(Self { types, index })
    }

    /// Parses `{"types": [...]}`.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(content)?;
        Self::new(raw.types)
    }

    /// Loads descriptors from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GenError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let set = Self::from_json_str(&content)?;
        tracing::debug!(path = %path.display(), types = set.len(), "loaded descriptors");
        Ok(set)
    }

    /// Resolves a qualified name.
    pub fn get(&self, name: &str) -> Result<DeclaredType<'_>> {
        self.index
            .get(name)
            .and_then(|&i| self.types.get(i))
            .map(|decl| DeclaredType { set: self, decl })
            .ok_or_else(|| GenError::UnknownType(name.to_string()))
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// A [`TypeDecl`] resolved against its [`DescriptorSet`].
#[derive(Debug, Clone, Copy)]
pub struct DeclaredType<'a> {
    set: &'a DescriptorSet,
    decl: &'a TypeDecl,
}

impl DeclaredType<'_> {
    /// The underlying declaration.
    #[must_use]
    pub const fn decl(&self) -> &TypeDecl {
        self.decl
    }
}

impl TypeDescriptor for DeclaredType<'_> {
    fn qualified_name(&self) -> &str {
        &self.decl.name
    }

    fn members(&self) -> &[MemberDecl] {
        &self.decl.members
    }

    fn ancestors(&self) -> Vec<Box<dyn TypeDescriptor + '_>> {
        // resolution cannot fail: `DescriptorSet::new` checked every ancestor
        self.decl
            .ancestors
            .iter()
            .filter_map(|name| self.set.get(name).ok())
            .map(|t| Box::new(t) as Box<dyn TypeDescriptor + '_>)
            .collect()
    }
}
