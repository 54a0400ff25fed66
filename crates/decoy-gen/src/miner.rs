//! Function miner.
//!
//! Walks a type and its ancestors depth-first, most-derived first, visiting
//! each ancestor once even in diamond hierarchies. The first declaration of a
//! signature identity wins, including its modifiers. A rejected member still
//! claims its identity, so a final override hides the ancestor's version.

use std::collections::HashSet;

use decoy_core::{Accessor, FunctionSignature, SignatureId};

use crate::descriptor::{FunctionDecl, MemberDecl, PropertyDecl, TypeDescriptor};
use crate::error::{GenError, UnsupportedReason};

/// Outcome of mining one type.
#[derive(Debug, Default)]
pub struct MiningReport {
    /// Qualified name of the mined type.
    pub type_name: String,
    /// Proxiable signatures in discovery order; identities are unique.
    pub signatures: Vec<FunctionSignature>,
    /// Members that cannot be proxied.
    pub rejected: Vec<GenError>,
}

impl MiningReport {
    /// Returns true if every member could be proxied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Extracts the overridable surface of a type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionMiner;

impl FunctionMiner {
    /// Creates a miner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Mines `descriptor` and its ancestors.
    pub fn extract(&self, descriptor: &dyn TypeDescriptor) -> MiningReport {
        let mut report = MiningReport {
            type_name: descriptor.qualified_name().to_string(),
            ..MiningReport::default()
        };
        let mut visited = HashSet::new();
        let mut seen = HashSet::new();
        walk(descriptor, &mut visited, &mut seen, &mut report);

        tracing::debug!(
            type_name = %report.type_name,
            signatures = report.signatures.len(),
            rejected = report.rejected.len(),
            "mined type"
        );
        report
    }
}

fn walk(
    ty: &dyn TypeDescriptor,
    visited: &mut HashSet<String>,
    seen: &mut HashSet<SignatureId>,
    report: &mut MiningReport,
) {
    if !visited.insert(ty.qualified_name().to_string()) {
        return;
    }
    let origin = ty.qualified_name();
    for member in ty.members() {
        let signatures = normalize(member, origin);
        let fresh: Vec<bool> = signatures.iter().map(|s| seen.insert(s.id())).collect();
        if !fresh.contains(&true) {
            // overridden by a more-derived declaration
            continue;
        }
        if let Err(reason) = check(member) {
            tracing::warn!(
                type_name = %origin,
                member = %member.name(),
                reason = %reason,
                "rejected member"
            );
            report
                .rejected
                .push(GenError::unsupported(origin, member.name(), reason));
            continue;
        }
        report.signatures.extend(
            signatures
                .into_iter()
                .zip(fresh)
                .filter_map(|(sig, is_fresh)| is_fresh.then_some(sig)),
        );
    }
    for ancestor in ty.ancestors() {
        walk(ancestor.as_ref(), visited, seen, report);
    }
}

fn check(member: &MemberDecl) -> Result<(), UnsupportedReason> {
    match member {
        MemberDecl::Function(f) => check_function(f),
        MemberDecl::Property(p) => check_property(p),
    }
}

fn check_function(f: &FunctionDecl) -> Result<(), UnsupportedReason> {
    if f.is_final {
        return Err(UnsupportedReason::Final);
    }
    if !f.has_receiver {
        return Err(UnsupportedReason::NoReceiver);
    }
    if !f.generics.is_empty() {
        return Err(UnsupportedReason::Generic(f.generics.clone()));
    }
    if is_borrow(&f.return_type) {
        return Err(UnsupportedReason::BorrowedReturn(f.return_type.clone()));
    }
    Ok(())
}

fn check_property(p: &PropertyDecl) -> Result<(), UnsupportedReason> {
    if p.is_final {
        return Err(UnsupportedReason::Final);
    }
    if !p.has_receiver {
        return Err(UnsupportedReason::NoReceiver);
    }
    if is_borrow(&p.ty) {
        return Err(UnsupportedReason::BorrowedReturn(p.ty.clone()));
    }
    Ok(())
}

fn is_borrow(ty: &str) -> bool {
    ty.trim_start().starts_with('&')
}

fn normalize(member: &MemberDecl, origin: &str) -> Vec<FunctionSignature> {
    match member {
        MemberDecl::Function(f) => {
            let mut sig = FunctionSignature::new(&f.name, f.return_type.trim()).origin(origin);
            sig.params.clone_from(&f.params);
            sig.modifiers.is_async = f.is_async;
            sig.modifiers.receiver = f.receiver;
            vec![sig]
        }
        MemberDecl::Property(p) => {
            let getter = FunctionSignature::new(&p.name, p.ty.trim())
                .accessor(Accessor::Getter)
                .origin(origin);
            if !p.mutable {
                return vec![getter];
            }
            let setter = FunctionSignature::new(format!("set_{}", p.name), "")
                .param("value", p.ty.trim())
                .accessor(Accessor::Setter)
                .mutable_receiver()
                .origin(origin);
            vec![getter, setter]
        }
    }
}
