use crate::config::SourceConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{Consolidator, LoadedSource};
use crate::utils::progress::ProgressReporter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use tracing::debug;

/// Identity of a source's inputs: its settings plus size and mtime of every file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFingerprint {
    settings: String,
    files: Vec<(PathBuf, u64, Option<SystemTime>)>,
}

impl SourceFingerprint {
    pub fn of(source: &SourceConfig) -> Result<Self> {
        let settings = serde_json::to_string(source)
            .map_err(|e| ProcessingError::Config(format!("cannot fingerprint source: {}", e)))?;

        let mut files = Vec::new();
        for path in source.input_files() {
            let metadata = std::fs::metadata(path)
                .map_err(|_| ProcessingError::MissingSourceFile(path.to_path_buf()))?;
            let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            files.push((canonical, metadata.len(), metadata.modified().ok()));
        }

        Ok(Self { settings, files })
    }
}

/// Consolidated tables kept for the lifetime of a session, one per source name.
///
/// An entry is reused while its fingerprint matches; a changed input file or
/// setting triggers a reload that replaces the stale entry.
#[derive(Default)]
pub struct SessionCache {
    entries: RwLock<HashMap<String, (SourceFingerprint, Arc<LoadedSource>)>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &self,
        source: &SourceConfig,
        progress: Option<&ProgressReporter>,
    ) -> Result<Arc<LoadedSource>> {
        self.get_or_load_with(source, |source| {
            Consolidator::new(source.clone()).consolidate(progress)
        })
    }

    /// Like [`get_or_load`](Self::get_or_load) with a caller-supplied loader
    pub fn get_or_load_with<F>(&self, source: &SourceConfig, load: F) -> Result<Arc<LoadedSource>>
    where
        F: FnOnce(&SourceConfig) -> Result<LoadedSource>,
    {
        let fingerprint = SourceFingerprint::of(source)?;

        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some((cached, loaded)) = entries.get(&source.name) {
                if *cached == fingerprint {
                    debug!("Session cache hit for {}", source.name);
                    return Ok(Arc::clone(loaded));
                }
            }
        }

        debug!("Session cache miss for {}", source.name);
        let loaded = Arc::new(load(source)?);

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(source.name.clone(), (fingerprint, Arc::clone(&loaded)));
        Ok(loaded)
    }

    pub fn invalidate(&self, name: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
