use crate::config::ArtifactConfig;
use crate::error::{ProcessingError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A pre-built data file handed out verbatim under a fixed name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        if !config.path.exists() {
            return Err(ProcessingError::MissingSourceFile(config.path.clone()));
        }

        Ok(Self {
            file_name: config.file_name.clone(),
            mime_type: config.mime_type.clone(),
            bytes: fs::read(&config.path)?,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the bytes into `dir` under the artifact's file name
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let target = dir.join(&self.file_name);
        fs::write(&target, &self.bytes)?;

        info!(
            "Saved {} ({} bytes, {}) to {}",
            self.file_name,
            self.bytes.len(),
            self.mime_type,
            target.display()
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bytes_pass_through() -> Result<()> {
        let dir = TempDir::new()?;
        let source = dir.path().join("grid.bin");
        let payload: Vec<u8> = (0..=255).collect();
        fs::write(&source, &payload)?;

        let config = ArtifactConfig {
            path: source,
            file_name: "GRUGEM1N1.B0.20150105.000000.nc".to_string(),
            mime_type: "application/netcdf".to_string(),
        };

        let artifact = DownloadArtifact::load(&config)?;
        assert_eq!(artifact.bytes, payload);

        let written = artifact.write_to(&dir.path().join("out"))?;
        assert!(written.ends_with("GRUGEM1N1.B0.20150105.000000.nc"));
        assert_eq!(fs::read(written)?, payload);
        Ok(())
    }

    #[test]
    fn test_missing_artifact() {
        let config = ArtifactConfig {
            path: PathBuf::from("/nonexistent/grid.nc"),
            file_name: "grid.nc".to_string(),
            mime_type: "application/netcdf".to_string(),
        };
        assert!(matches!(
            DownloadArtifact::load(&config),
            Err(ProcessingError::MissingSourceFile(_))
        ));
    }
}
