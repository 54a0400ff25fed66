//! Generation sessions.
//!
//! A session owns the emitted-set for one run. Asking twice for the same
//! (type, kind) pair is a no-op, as is emitting into a backend that already
//! holds the artifact. Two different types mapping to one artifact is an
//! error. Member rejections are collected, never fatal.

use std::collections::{HashMap, HashSet};
use std::fmt;

use decoy_core::DoubleKind;
use serde::{Deserialize, Serialize};

use crate::backend::{Artifact, ArtifactBackend, FileBackend};
use crate::config::GenConfig;
use crate::descriptor::{DescriptorSet, TypeDescriptor};
use crate::error::{GenError, Result};
use crate::generator::{double_name, generator_for, reject_overloads};
use crate::ir::artifact_stem;
use crate::miner::FunctionMiner;
use crate::render::RustRenderer;

/// Result of one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// A new artifact was emitted.
    Written,
    /// The double already existed and was left untouched.
    Skipped,
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Names of emitted doubles.
    pub generated: Vec<String>,
    /// Names of doubles skipped as already generated.
    pub skipped: Vec<String>,
    /// Rejected members, one message each.
    pub rejected: Vec<String>,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generated, {} skipped, {} members rejected",
            self.generated.len(),
            self.skipped.len(),
            self.rejected.len()
        )
    }
}

/// Mines, generates, renders and emits doubles into one backend.
#[derive(Debug)]
pub struct GenerationSession<B> {
    miner: FunctionMiner,
    renderer: RustRenderer,
    backend: B,
    emitted: HashSet<(String, DoubleKind)>,
    // stem -> source that claimed it
    stems: HashMap<String, String>,
    report: GenerationReport,
}

impl<B: ArtifactBackend> GenerationSession<B> {
    /// Creates a session with the default renderer.
    pub fn new(backend: B) -> Self {
        Self {
            miner: FunctionMiner::new(),
            renderer: RustRenderer::new(),
            backend,
            emitted: HashSet::new(),
            stems: HashMap::new(),
            report: GenerationReport::default(),
        }
    }

    /// Replaces the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: RustRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Generates one double of `descriptor`.
    ///
    /// # Errors
    /// Returns [`GenError::NameClash`] when another type already claimed the
    /// artifact, and backend failures other than a duplicate artifact.
    pub fn generate(
        &mut self,
        descriptor: &dyn TypeDescriptor,
        kind: DoubleKind,
    ) -> Result<Emission> {
        let source = descriptor.qualified_name().to_string();
        let name = double_name(&source, kind);
        if !self.emitted.insert((source.clone(), kind)) {
            tracing::info!(
                type_name = %source,
                kind = %kind,
                "double already generated, skipping"
            );
            self.report.skipped.push(name);
            return Ok(Emission::Skipped);
        }

        let stem = artifact_stem(&source, &name);
        if let Some(first) = self.stems.get(&stem) {
            return Err(GenError::NameClash {
                stem,
                first: first.clone(),
                second: source,
            });
        }
        self.stems.insert(stem.clone(), source.clone());

        if self.backend.contains(&stem) {
            tracing::info!(name = %name, stem = %stem, "artifact already exists, skipping");
            self.report.skipped.push(name);
            return Ok(Emission::Skipped);
        }

        let mined = self.miner.extract(descriptor);
        let (signatures, overloaded) = reject_overloads(mined.signatures);
        self.report.rejected.extend(
            mined
                .rejected
                .iter()
                .chain(&overloaded)
                .map(ToString::to_string),
        );

        let ty = generator_for(kind).create_double(&source, &signatures);
        let artifact = Artifact {
            stem,
            source: self.renderer.render(&ty),
            name: ty.name,
        };

        match self.backend.emit(&artifact) {
            Ok(()) => {
                tracing::info!(
                    name = %artifact.name,
                    stem = %artifact.stem,
                    members = signatures.len(),
                    "generated double"
                );
                self.report.generated.push(artifact.name);
                Ok(Emission::Written)
            }
            Err(GenError::DuplicateArtifact { name }) => {
                tracing::info!(name = %name, "artifact already exists, skipping");
                self.report.skipped.push(name);
                Ok(Emission::Skipped)
            }
            Err(e) => Err(e),
        }
    }

    /// Report so far.
    #[must_use]
    pub const fn report(&self) -> &GenerationReport {
        &self.report
    }

    /// The backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Ends the session.
    pub fn finish(self) -> (B, GenerationReport) {
        (self.backend, self.report)
    }
}

/// Runs a full generation from configuration.
///
/// Every requested type is resolved and checked for artifact clashes before
/// the output directory is reset, so a misconfigured run leaves previous
/// output in place.
pub fn run(config: &GenConfig) -> Result<GenerationReport> {
    config.validate()?;
    let descriptors = DescriptorSet::load(&config.descriptors)?;

    let requests = config
        .mocks
        .iter()
        .map(|name| (name, DoubleKind::Mock))
        .chain(config.spies.iter().map(|name| (name, DoubleKind::Spy)));
    let mut resolved = Vec::new();
    let mut claimed: HashMap<String, String> = HashMap::new();
    for (name, kind) in requests {
        let ty = descriptors.get(name)?;
        let source = ty.qualified_name().to_string();
        let stem = artifact_stem(&source, &double_name(&source, kind));
        match claimed.insert(stem.clone(), source.clone()) {
            Some(first) if first != source => {
                return Err(GenError::NameClash {
                    stem,
                    first,
                    second: source,
                });
            }
            _ => {}
        }
        resolved.push((ty, kind));
    }

    let backend = FileBackend::new(&config.output_dir);
    backend.reset()?;

    let mut session = GenerationSession::new(backend)
        .with_renderer(RustRenderer::with_runtime_path(&config.runtime_path));
    for (ty, kind) in &resolved {
        session.generate(ty, *kind)?;
    }

    let (_, report) = session.finish();
    tracing::info!(
        generated = report.generated.len(),
        skipped = report.skipped.len(),
        rejected = report.rejected.len(),
        output_dir = %config.output_dir.display(),
        "generation finished"
    );
    Ok(report)
}
