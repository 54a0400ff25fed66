//! Code Generation Example
//!
//! Mines a small type hierarchy and prints the generated mock and spy sources.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example codegen
//! ```

use decoy::codegen::{
    DescriptorSet, FunctionDecl, GenError, GenerationSession, MemoryBackend, PropertyDecl,
    TypeDecl,
};
use decoy::runtime::DoubleKind;

fn main() -> Result<(), GenError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let set = DescriptorSet::new(vec![
        TypeDecl::new("app::Greeter")
            .extends("app::Named")
            .member(FunctionDecl::new("greet", "String").param("name", "&str"))
            .member(FunctionDecl {
                is_async: true,
                ..FunctionDecl::new("fetch_motd", "String")
            })
            .member(FunctionDecl {
                has_receiver: false,
                ..FunctionDecl::new("new", "Self")
            }),
        TypeDecl::new("app::Named").member(PropertyDecl {
            name: "name".into(),
            ty: "String".into(),
            mutable: true,
            is_final: false,
            has_receiver: true,
        }),
    ])?;

    let greeter = set.get("app::Greeter")?;
    let mut session = GenerationSession::new(MemoryBackend::new());
    session.generate(&greeter, DoubleKind::Mock)?;
    session.generate(&greeter, DoubleKind::Spy)?;
    // second request is a no-op
    session.generate(&greeter, DoubleKind::Mock)?;

    let (backend, report) = session.finish();
    for artifact in backend.artifacts() {
        println!("// ===== {}.rs =====", artifact.stem);
        println!("{}", artifact.source);
    }
    for reason in &report.rejected {
        println!("rejected: {reason}");
    }
    println!("{report}");
    Ok(())
}
