//! Mock and spy generators.
//!
//! Every mined signature that survives [`reject_overloads`] becomes a member,
//! and a full mock fails unmatched calls at run time rather than at
//! generation time.

use std::collections::HashSet;

use decoy_core::{DoubleKind, FunctionSignature};

use crate::error::{GenError, UnsupportedReason};
use crate::ir::{Argument, Fallback, GeneratedMember, GeneratedType, Packaging};

/// Builds the IR of one kind of double.
pub trait Generator {
    /// The kind this generator produces.
    fn kind(&self) -> DoubleKind;

    /// Builds a double of `source` from its mined signatures.
    fn create_double(&self, source: &str, signatures: &[FunctionSignature]) -> GeneratedType {
        create_double(self.kind(), source, signatures)
    }
}

/// Full mock: unmatched calls fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

impl Generator for MockGenerator {
    fn kind(&self) -> DoubleKind {
        DoubleKind::Mock
    }
}

/// Spy: unmatched calls delegate to the wrapped instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpyGenerator;

impl Generator for SpyGenerator {
    fn kind(&self) -> DoubleKind {
        DoubleKind::Spy
    }
}

/// Returns the generator for `kind`.
#[must_use]
pub fn generator_for(kind: DoubleKind) -> &'static dyn Generator {
    match kind {
        DoubleKind::Mock => &MockGenerator,
        DoubleKind::Spy => &SpyGenerator,
    }
}

/// Name of the double generated for `source`.
#[must_use]
pub fn double_name(source: &str, kind: DoubleKind) -> String {
    let simple = source.rsplit("::").next().unwrap_or(source);
    format!("{simple}{}", kind.suffix())
}

/// Splits off members whose name is already taken by an earlier signature.
///
/// A Rust impl cannot hold two methods of one name, so only the first
/// (most-derived) overload is kept; later ones come back as rejections.
#[must_use]
pub fn reject_overloads(
    signatures: Vec<FunctionSignature>,
) -> (Vec<FunctionSignature>, Vec<GenError>) {
    let mut names = HashSet::new();
    let mut kept = Vec::with_capacity(signatures.len());
    let mut rejected = Vec::new();
    for sig in signatures {
        if names.insert(sig.name.clone()) {
            kept.push(sig);
        } else {
            tracing::warn!(
                type_name = %sig.origin,
                member = %sig.name,
                signature = %sig.id(),
                "rejected overloaded member"
            );
            let reason = UnsupportedReason::Overloaded(sig.id().to_string());
            rejected.push(GenError::unsupported(&sig.origin, &sig.name, reason));
        }
    }
    (kept, rejected)
}

/// Builds the IR of a `kind` double of `source`.
#[must_use]
pub fn create_double(
    kind: DoubleKind,
    source: &str,
    signatures: &[FunctionSignature],
) -> GeneratedType {
    let fallback = match kind {
        DoubleKind::Mock => Fallback::Fail,
        DoubleKind::Spy => Fallback::CallThrough,
    };
    let members = signatures
        .iter()
        .enumerate()
        .map(|(index, signature)| GeneratedMember {
            index,
            arguments: arguments(signature, fallback),
            signature: signature.clone(),
            fallback,
        })
        .collect();

    GeneratedType {
        name: double_name(source, kind),
        source: source.to_string(),
        kind,
        members,
    }
}

fn arguments(signature: &FunctionSignature, fallback: Fallback) -> Vec<Argument> {
    signature
        .params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            let packaging = if param.is_borrowed() {
                Packaging::ToOwned
            } else if fallback == Fallback::CallThrough {
                Packaging::Clone
            } else {
                Packaging::Move
            };
            Argument {
                binding: binding(&param.name, i),
                ty: param.ty.clone(),
                packaging,
            }
        })
        .collect()
}

fn binding(name: &str, position: usize) -> String {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && name != "_"
        && name != "self";
    if valid {
        name.to_string()
    } else {
        format!("arg{position}")
    }
}
