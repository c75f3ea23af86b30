//! Artifact cache and preview sessions.
//!
//! The host renders each artifact into a disposable surface keyed by a
//! generation number. Reloading re-issues the same artifact under a fresh
//! generation so the host throws the old surface away.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

use crate::options::PreviewOptions;
use crate::transform::{transform_with_options, BuildArtifact};

/// Hex SHA-256 of a source text.
pub fn fingerprint(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-memory map from source fingerprint to built artifact.
///
/// Keyed on the source alone; use one cache per option set.
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: HashMap<String, Arc<BuildArtifact>>,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source: &str) -> Option<Arc<BuildArtifact>> {
        self.entries.get(&fingerprint(source)).cloned()
    }

    /// Return the cached artifact for `source`, building it on a miss.
    pub fn get_or_build(&mut self, source: &str, options: &PreviewOptions) -> Arc<BuildArtifact> {
        let key = fingerprint(source);
        if let Some(hit) = self.entries.get(&key) {
            return Arc::clone(hit);
        }
        let artifact = Arc::new(transform_with_options(source, options));
        self.entries.insert(key, Arc::clone(&artifact));
        artifact
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One artifact as handed to the host surface.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    /// Strictly increasing per session
    pub generation: u64,
    pub artifact: Arc<BuildArtifact>,
}

#[derive(Debug, Default)]
pub struct PreviewSession {
    options: PreviewOptions,
    cache: ArtifactCache,
    generation: u64,
    current: Option<Arc<BuildArtifact>>,
}

impl PreviewSession {
    pub fn new(options: PreviewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    pub fn load(&mut self, source: &str) -> PreviewFrame {
        let artifact = self.cache.get_or_build(source, &self.options);
        self.current = Some(Arc::clone(&artifact));
        self.next_frame(artifact)
    }

    /// Re-issue the current artifact under a new generation.
    pub fn reload(&mut self) -> Option<PreviewFrame> {
        let artifact = self.current.clone()?;
        Some(self.next_frame(artifact))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn next_frame(&mut self, artifact: Arc<BuildArtifact>) -> PreviewFrame {
        self.generation += 1;
        PreviewFrame {
            generation: self.generation,
            artifact,
        }
    }
}
