// Iron Lotus: Allow unwrap/expect in tests for clear failure messages
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # decoy-gen
//!
//! Generation half of the decoy test-double framework.
//!
//! Pipeline: [`TypeDescriptor`] → [`FunctionMiner`] → signature set →
//! [`Generator`] → [`GeneratedType`] IR → [`RustRenderer`] → [`ArtifactBackend`].
//!
//! - [`DescriptorSet`]: serde-backed descriptors read from `descriptors.json`
//! - [`FunctionMiner`]: deduplicated, most-derived-first signature extraction
//! - [`MockGenerator`] / [`SpyGenerator`]: IR construction
//! - [`RustRenderer`]: IR to Rust source
//! - [`FileBackend`] / [`MemoryBackend`]: artifact destinations
//! - [`GenerationSession`]: idempotent per-run orchestration
//!
//! ## Example
//!
//! ```rust
//! use decoy_core::DoubleKind;
//! use decoy_gen::{DescriptorSet, FunctionDecl, GenerationSession, MemoryBackend, TypeDecl};
//!
//! let set = DescriptorSet::new(vec![
//!     TypeDecl::new("app::Greeter")
//!         .member(FunctionDecl::new("greet", "String").param("name", "String")),
//! ])
//! .unwrap();
//!
//! let mut session = GenerationSession::new(MemoryBackend::new());
//! session.generate(&set.get("app::Greeter").unwrap(), DoubleKind::Mock).unwrap();
//!
//! let (backend, report) = session.finish();
//! assert_eq!(report.generated, vec!["GreeterMock"]);
//! assert!(backend.get("app/greeter_mock").is_some());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod ir;
pub mod miner;
pub mod render;
pub mod session;

pub use backend::{Artifact, ArtifactBackend, FileBackend, MemoryBackend};
pub use config::{DEFAULT_CONFIG, GenConfig};
pub use descriptor::{
    DeclaredType, DescriptorSet, FunctionDecl, MemberDecl, PropertyDecl, TypeDecl,
    TypeDescriptor,
};
pub use error::{GenError, Result, UnsupportedReason};
pub use generator::{
    Generator, MockGenerator, SpyGenerator, create_double, double_name, reject_overloads,
};
pub use ir::{Argument, Fallback, GeneratedMember, GeneratedType, Packaging, artifact_stem};
pub use miner::{FunctionMiner, MiningReport};
pub use render::RustRenderer;
pub use session::{Emission, GenerationReport, GenerationSession, run};
