//! Intermediate representation of a generated double.
//!
//! The IR fixes every decision a backend needs (names, dispatch indices, how
//! each argument is packaged, what happens when no stub matches) so that
//! renderers only print.

use decoy_core::{DoubleKind, FunctionSignature};
use serde::{Deserialize, Serialize};

/// How a parameter is turned into an owned, recordable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Packaging {
    /// Moved into the recorded value.
    Move,
    /// Cloned, the original is still needed for call-through.
    Clone,
    /// Borrowed parameter recorded through `ToOwned`.
    ToOwned,
}

/// One packaged argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Binding name in the generated member.
    pub binding: String,
    /// Declared type.
    pub ty: String,
    /// Packaging strategy.
    pub packaging: Packaging,
}

/// What a member does when no stub rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Surface an unstubbed-call error.
    Fail,
    /// Delegate to the wrapped instance.
    CallThrough,
}

/// One generated member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMember {
    /// Position in the double's signature table.
    pub index: usize,
    /// Mined signature.
    pub signature: FunctionSignature,
    /// Arguments in declaration order.
    pub arguments: Vec<Argument>,
    /// Unmatched-call behaviour.
    pub fallback: Fallback,
}

/// A generated mock or spy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedType {
    /// Generated type name, `<TypeName>Mock` or `<TypeName>Spy`.
    pub name: String,
    /// Qualified name of the doubled type.
    pub source: String,
    /// Mock or spy.
    pub kind: DoubleKind,
    /// Members in dispatch order.
    pub members: Vec<GeneratedMember>,
}

impl GeneratedType {
    /// Signatures in dispatch order.
    pub fn signatures(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.members.iter().map(|m| &m.signature)
    }

    /// File stem for the rendered artifact, e.g. `app/greeter_mock`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        artifact_stem(&self.source, &self.name)
    }
}

/// File stem of the double `name` generated for `source`.
///
/// Module segments of the source become directories, so types sharing a
/// simple name in different modules never share a file.
#[must_use]
pub fn artifact_stem(source: &str, name: &str) -> String {
    let mut segments: Vec<&str> = source.split("::").filter(|s| !s.is_empty()).collect();
    segments.pop();
    let file = snake_case(name);
    if segments.is_empty() {
        file
    } else {
        format!("{}/{file}", segments.join("/"))
    }
}

/// Converts `UpperCamelCase` to `snake_case`.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower =
                i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            if prev_lower || (prev_upper && next_lower) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
