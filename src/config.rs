use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_ARTIFACT_FILE_NAME, DEFAULT_ARTIFACT_MIME, DEFAULT_CONFIG_FILE,
    DEFAULT_COORDINATES_HEADER_ROW, DEFAULT_COORDINATES_SHEET, DEFAULT_EXCLUDED_COLUMNS,
    DEFAULT_ZONE_LETTER, DEFAULT_ZONE_NUMBER,
};
use crate::utils::coordinates::UtmZone;
use crate::utils::values::UnparseablePolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

/// Where sensor positions come from and how to project them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CoordinatesConfig {
    pub path: PathBuf,

    #[serde(default = "default_coordinates_sheet")]
    #[validate(length(min = 1))]
    pub sheet: String,

    /// Zero-based row holding the `id`/`x`/`y` header
    #[serde(default = "default_header_row")]
    pub header_row: usize,

    #[serde(default = "default_zone_number")]
    #[validate(range(min = 1, max = 60))]
    pub zone_number: u8,

    #[serde(default = "default_zone_letter")]
    pub zone_letter: char,
}

impl CoordinatesConfig {
    pub fn zone(&self) -> Result<UtmZone> {
        UtmZone::new(self.zone_number, self.zone_letter)
    }
}

/// A pre-existing binary file offered for download as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ArtifactConfig {
    pub path: PathBuf,

    #[serde(default = "default_artifact_file_name")]
    #[validate(length(min = 1))]
    pub file_name: String,

    #[serde(default = "default_artifact_mime")]
    #[validate(length(min = 1))]
    pub mime_type: String,
}

/// One instrument: its samples workbook and everything needed to consolidate it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    #[validate(length(min = 1))]
    pub name: String,

    pub samples: PathBuf,

    pub coordinates: CoordinatesConfig,

    #[serde(default = "default_excluded_columns")]
    pub excluded_columns: Vec<String>,

    #[serde(default)]
    pub unparseable: UnparseablePolicy,

    #[serde(default)]
    pub artifact: Option<ArtifactConfig>,
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, samples: PathBuf, coordinates: PathBuf) -> Self {
        Self {
            name: name.into(),
            samples,
            coordinates: CoordinatesConfig {
                path: coordinates,
                sheet: default_coordinates_sheet(),
                header_row: default_header_row(),
                zone_number: default_zone_number(),
                zone_letter: default_zone_letter(),
            },
            excluded_columns: default_excluded_columns(),
            unparseable: UnparseablePolicy::default(),
            artifact: None,
        }
    }

    pub fn with_artifact(mut self, path: PathBuf) -> Self {
        self.artifact = Some(ArtifactConfig {
            path,
            file_name: default_artifact_file_name(),
            mime_type: default_artifact_mime(),
        });
        self
    }

    /// Every file the consolidation reads
    pub fn input_files(&self) -> Vec<&Path> {
        vec![self.coordinates.path.as_path(), self.samples.as_path()]
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.coordinates.validate()?;
        self.coordinates.zone()?;
        if let Some(artifact) = &self.artifact {
            artifact.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl DashboardConfig {
    /// Load from a TOML file and `SENSOR_DASHBOARD__*` environment overrides.
    ///
    /// Without an explicit path `dashboard.toml` is used when present, and the
    /// built-in GEM/MX6 sources otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ProcessingError::MissingSourceFile(path.to_path_buf()));
                }
                builder.add_source(config::File::from(path).required(true))
            }
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(config::Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__"))
            .build()?;

        let config: DashboardConfig = settings.try_deserialize()?;
        config.check()?;

        debug!("Loaded configuration with {} sources", config.sources.len());
        Ok(config)
    }

    pub fn check(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(ProcessingError::Config("no data sources configured".to_string()));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            source.check()?;
            if !seen.insert(source.name.as_str()) {
                return Err(ProcessingError::Config(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        Ok(())
    }

    pub fn source(&self, name: &str) -> Result<&SourceConfig> {
        self.sources
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ProcessingError::UnknownSource(name.to_string()))
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
        }
    }
}

fn default_sources() -> Vec<SourceConfig> {
    let coordinates = PathBuf::from("amostragem_GEM.xlsx");
    let artifact = PathBuf::from(DEFAULT_ARTIFACT_FILE_NAME);

    vec![
        SourceConfig::new("GEM", PathBuf::from("amostragem_GEM_2015.xlsx"), coordinates.clone())
            .with_artifact(artifact.clone()),
        SourceConfig::new("MX6", PathBuf::from("amostragem_MX6_2015.xlsx"), coordinates)
            .with_artifact(artifact),
    ]
}

fn default_coordinates_sheet() -> String {
    DEFAULT_COORDINATES_SHEET.to_string()
}

fn default_header_row() -> usize {
    DEFAULT_COORDINATES_HEADER_ROW
}

fn default_zone_number() -> u8 {
    DEFAULT_ZONE_NUMBER
}

fn default_zone_letter() -> char {
    DEFAULT_ZONE_LETTER
}

fn default_excluded_columns() -> Vec<String> {
    DEFAULT_EXCLUDED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_artifact_file_name() -> String {
    DEFAULT_ARTIFACT_FILE_NAME.to_string()
}

fn default_artifact_mime() -> String {
    DEFAULT_ARTIFACT_MIME.to_string()
}
