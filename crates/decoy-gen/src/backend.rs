//! Artifact backends.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{GenError, Result};

/// A rendered double ready to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Generated type name.
    pub name: String,
    /// File stem relative to the output root, e.g. `app/greeter_mock`.
    pub stem: String,
    /// Rendered source.
    pub source: String,
}

/// Destination for rendered doubles.
pub trait ArtifactBackend {
    /// Stores an artifact. Fails with [`GenError::DuplicateArtifact`] if one
    /// with the same stem already exists.
    fn emit(&mut self, artifact: &Artifact) -> Result<()>;

    /// Returns true if an artifact with this stem exists.
    fn contains(&self, stem: &str) -> bool;
}

/// Writes `<root>/<stem>.rs` files, creating module directories as needed.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Creates a backend writing below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an artifact with `stem` is written to.
    #[must_use]
    pub fn path_for(&self, stem: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(stem.split('/'));
        path.set_extension("rs");
        path
    }

    /// Deletes and recreates the output directory.
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        std::fs::create_dir_all(&self.root)?;
        tracing::debug!(root = %self.root.display(), "reset output directory");
        Ok(())
    }
}

impl ArtifactBackend for FileBackend {
    fn emit(&mut self, artifact: &Artifact) -> Result<()> {
        let path = self.path_for(&artifact.stem);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(GenError::DuplicateArtifact {
                    name: artifact.name.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(artifact.source.as_bytes())?;
        tracing::debug!(
            path = %path.display(),
            bytes = artifact.source.len(),
            "wrote artifact"
        );
        Ok(())
    }

    fn contains(&self, stem: &str) -> bool {
        self.path_for(stem).exists()
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    artifacts: BTreeMap<String, Artifact>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an artifact by stem.
    #[must_use]
    pub fn get(&self, stem: &str) -> Option<&Artifact> {
        self.artifacts.get(stem)
    }

    /// All artifacts, ordered by stem.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns true if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactBackend for MemoryBackend {
    fn emit(&mut self, artifact: &Artifact) -> Result<()> {
        if self.artifacts.contains_key(&artifact.stem) {
            return Err(GenError::DuplicateArtifact {
                name: artifact.name.clone(),
            });
        }
        self.artifacts.insert(artifact.stem.clone(), artifact.clone());
        Ok(())
    }

    fn contains(&self, stem: &str) -> bool {
        self.artifacts.contains_key(stem)
    }
}
