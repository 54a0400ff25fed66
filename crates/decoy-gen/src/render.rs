//! Rust source renderer.
//!
//! Renders a [`GeneratedType`] into a self-contained Rust module: a struct
//! holding a `DoubleCore` (plus the delegate for spies), a constructor, the
//! `decoy()` handle used for stubbing and verification, and one trait impl per
//! declaring trait: the doubled trait first, then each ancestor that
//! contributed members. Qualified type names are emitted verbatim as trait
//! paths.
//!
//! Spy arguments are cloned before recording so they can still be passed to
//! the delegate; parameter types of spied members must be `Clone`. Borrowed
//! parameters are recorded through `ToOwned`.

use decoy_core::{Accessor, DoubleKind, FunctionSignature, Receiver};

use crate::ir::{Argument, Fallback, GeneratedMember, GeneratedType, Packaging};

const PANIC_ON_ERROR: &str = ".unwrap_or_else(|e| panic!(\"{e}\"))";

/// Renders IR into Rust source text.
#[derive(Debug, Clone)]
pub struct RustRenderer {
    runtime_path: String,
}

impl Default for RustRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RustRenderer {
    /// Creates a renderer targeting the `decoy` facade crate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_runtime_path("::decoy::runtime")
    }

    /// Creates a renderer targeting another path to `decoy-core`.
    #[must_use]
    pub fn with_runtime_path(path: impl Into<String>) -> Self {
        Self {
            runtime_path: path.into(),
        }
    }

    /// Path the generated code uses for `decoy-core` items.
    #[must_use]
    pub fn runtime_path(&self) -> &str {
        &self.runtime_path
    }

    /// Renders one generated type.
    #[must_use]
    pub fn render(&self, ty: &GeneratedType) -> String {
        let mut out = Source::default();
        let banner = format!("// @generated by decoy-gen from `{}`. Do not edit.", ty.source);
        out.line(0, &banner);
        out.blank();
        self.render_struct(&mut out, ty);
        out.blank();
        self.render_inherent(&mut out, ty);
        if ty.kind == DoubleKind::Mock {
            out.blank();
            render_default(&mut out, ty);
        }
        out.blank();
        self.render_trait_impl(&mut out, ty);
        out.finish()
    }

    fn rt(&self, item: &str) -> String {
        format!("{}::{item}", self.runtime_path)
    }

    fn render_struct(&self, out: &mut Source, ty: &GeneratedType) {
        let what = match ty.kind {
            DoubleKind::Mock => "Mock",
            DoubleKind::Spy => "Spy",
        };
        out.line(0, &format!("/// {what} of `{}`.", ty.source));
        match ty.kind {
            DoubleKind::Mock => {
                out.line(0, &format!("pub struct {} {{", ty.name));
                out.line(1, &format!("core: {},", self.rt("DoubleCore")));
            }
            DoubleKind::Spy => {
                out.line(0, &format!("pub struct {}<D> {{", ty.name));
                out.line(1, &format!("core: {},", self.rt("DoubleCore")));
                out.line(1, "delegate: D,");
            }
        }
        out.line(0, "}");
    }

    fn render_inherent(&self, out: &mut Source, ty: &GeneratedType) {
        match ty.kind {
            DoubleKind::Mock => {
                out.line(0, &format!("impl {} {{", ty.name));
                out.line(1, "/// Creates the mock using the process-wide mode.");
                out.line(1, "pub fn new() -> Self {");
                out.line(2, "Self {");
                let core = self.rt("DoubleCore::mock");
                out.line(3, &format!("core: {core}({:?}, Self::signatures()),", ty.name));
                out.line(2, "}");
                out.line(1, "}");
            }
            DoubleKind::Spy => {
                out.line(0, &format!("impl<D: {}> {}<D> {{", ty.source, ty.name));
                out.line(1, "/// Wraps `delegate`; unstubbed calls are forwarded to it.");
                out.line(1, "pub fn new(delegate: D) -> Self {");
                out.line(2, "Self {");
                let core = self.rt("DoubleCore::spy");
                out.line(3, &format!("core: {core}({:?}, Self::signatures()),", ty.name));
                out.line(3, "delegate,");
                out.line(2, "}");
                out.line(1, "}");
                out.blank();
                out.line(1, "/// The wrapped instance.");
                out.line(1, "pub fn delegate(&self) -> &D {");
                out.line(2, "&self.delegate");
                out.line(1, "}");
                out.blank();
                out.line(1, "/// Unwraps the spy.");
                out.line(1, "pub fn into_inner(self) -> D {");
                out.line(2, "self.delegate");
                out.line(1, "}");
            }
        }
        out.blank();
        out.line(1, "/// Signature table in dispatch order.");
        let table = self.rt("FunctionSignature");
        out.line(1, &format!("pub fn signatures() -> Vec<{table}> {{"));
        out.line(2, "vec![");
        for member in &ty.members {
            self.render_signature(out, &member.signature);
        }
        out.line(2, "]");
        out.line(1, "}");
        out.blank();
        out.line(1, "/// Stubbing and verification handle.");
        out.line(1, &format!("pub fn decoy(&self) -> &{} {{", self.rt("DoubleCore")));
        out.line(2, "&self.core");
        out.line(1, "}");
        out.line(0, "}");
    }

    fn render_signature(&self, out: &mut Source, sig: &FunctionSignature) {
        let new = self.rt("FunctionSignature::new");
        out.line(3, &format!("{new}({:?}, {:?})", sig.name, sig.return_type));
        for param in &sig.params {
            out.line(4, &format!(".param({:?}, {:?})", param.name, param.ty));
        }
        if sig.modifiers.is_async {
            out.line(4, ".asynchronous()");
        }
        match sig.modifiers.accessor {
            Some(Accessor::Getter) => {
                out.line(4, &format!(".accessor({})", self.rt("Accessor::Getter")));
            }
            Some(Accessor::Setter) => {
                out.line(4, &format!(".accessor({})", self.rt("Accessor::Setter")));
            }
            None => {}
        }
        if sig.modifiers.receiver == Receiver::Mut {
            out.line(4, ".mutable_receiver()");
        }
        out.line(4, &format!(".origin({:?}),", sig.origin));
    }

    fn render_trait_impl(&self, out: &mut Source, ty: &GeneratedType) {
        for (i, (origin, members)) in by_origin(ty).into_iter().enumerate() {
            if i > 0 {
                out.blank();
            }
            out.line(0, "#[allow(clippy::panic, clippy::clone_on_copy)]");
            let head = match ty.kind {
                DoubleKind::Mock => format!("impl {origin} for {} {{", ty.name),
                DoubleKind::Spy => format!("impl<D: {}> {origin} for {}<D> {{", ty.source, ty.name),
            };
            out.line(0, &head);
            for (j, member) in members.into_iter().enumerate() {
                if j > 0 {
                    out.blank();
                }
                self.render_member(out, member);
            }
            out.line(0, "}");
        }
    }

    fn render_member(&self, out: &mut Source, member: &GeneratedMember) {
        let sig = &member.signature;
        out.line(1, &format!("{} {{", header(member)));

        let packaged = member
            .arguments
            .iter()
            .map(|a| format!("{}({})", self.rt("Value::new"), package(a)))
            .collect::<Vec<_>>()
            .join(", ");
        let args = format!("vec![{packaged}]");
        let index = member.index;

        match (member.fallback, sig.modifiers.is_async) {
            (Fallback::Fail, _) => {
                out.line(2, "self.core");
                out.line(3, &format!(".dispatch({index}, {args})"));
                out.line(3, PANIC_ON_ERROR);
            }
            (Fallback::CallThrough, false) => {
                let call = delegate_call(member);
                out.line(2, "self.core");
                out.line(3, &format!(".dispatch_or({index}, {args}, || {call})"));
                out.line(3, PANIC_ON_ERROR);
            }
            (Fallback::CallThrough, true) => {
                let answered = self.rt("Outcome::Answered");
                let call_through = self.rt("Outcome::CallThrough");
                let call = delegate_call(member);
                out.line(
                    2,
                    &format!("match self.core.invoke({index}, {args}){PANIC_ON_ERROR} {{"),
                );
                out.line(
                    3,
                    &format!(
                        "{answered}(value) => self.core.convert({index}, &value){PANIC_ON_ERROR},"
                    ),
                );
                out.line(3, &format!("{call_through} => {call}.await,"));
                out.line(2, "}");
            }
        }
        out.line(1, "}");
    }
}

fn render_default(out: &mut Source, ty: &GeneratedType) {
    out.line(0, &format!("impl Default for {} {{", ty.name));
    out.line(1, "fn default() -> Self {");
    out.line(2, "Self::new()");
    out.line(1, "}");
    out.line(0, "}");
}

/// Groups members by declaring trait, the doubled trait first even when it
/// declares nothing itself.
fn by_origin(ty: &GeneratedType) -> Vec<(&str, Vec<&GeneratedMember>)> {
    let mut groups: Vec<(&str, Vec<&GeneratedMember>)> = vec![(ty.source.as_str(), Vec::new())];
    for member in &ty.members {
        let origin = match member.signature.origin.as_str() {
            "" => ty.source.as_str(),
            origin => origin,
        };
        match groups.iter_mut().find(|(name, _)| *name == origin) {
            Some((_, group)) => group.push(member),
            None => groups.push((origin, vec![member])),
        }
    }
    groups
}

fn header(member: &GeneratedMember) -> String {
    let sig = &member.signature;
    let receiver = match sig.modifiers.receiver {
        Receiver::Ref => "&self",
        Receiver::Mut => "&mut self",
    };
    let params: String = member
        .arguments
        .iter()
        .map(|a| format!(", {}: {}", a.binding, a.ty))
        .collect();
    let asyncness = if sig.modifiers.is_async { "async " } else { "" };
    let ret = if sig.returns_unit() {
        String::new()
    } else {
        format!(" -> {}", sig.return_type.trim())
    };
    format!("{asyncness}fn {}({receiver}{params}){ret}", sig.name)
}

fn package(arg: &Argument) -> String {
    match arg.packaging {
        Packaging::Move => arg.binding.clone(),
        Packaging::Clone => format!("{}.clone()", arg.binding),
        Packaging::ToOwned => format!("{}.to_owned()", arg.binding),
    }
}

fn delegate_call(member: &GeneratedMember) -> String {
    let args = member
        .arguments
        .iter()
        .map(|a| a.binding.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("self.delegate.{}({args})", member.signature.name)
}

#[derive(Default)]
struct Source {
    text: String,
}

impl Source {
    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.text.push_str("    ");
        }
        self.text.push_str(text);
        self.text.push('\n');
    }

    fn blank(&mut self) {
        self.text.push('\n');
    }

    fn finish(self) -> String {
        self.text
    }
}
