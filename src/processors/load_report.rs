use crate::models::SensorId;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a variable sheet was left out of the consolidated table
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    #[error("column '{0}' is missing")]
    MissingColumn(String),

    #[error("sheet could not be read: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SheetStatus {
    Loaded {
        rows: usize,
        observations: usize,
        duplicates_removed: usize,
        dropped_columns: Vec<String>,
    },
    Skipped {
        reason: SkipReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOutcome {
    pub sheet: String,
    pub status: SheetStatus,
}

impl SheetOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, SheetStatus::Loaded { .. })
    }
}

/// Per-sheet result of one consolidation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub source: String,
    pub samples_path: PathBuf,
    pub coordinates_path: PathBuf,
    pub sheets: Vec<SheetOutcome>,
    pub geocoded_sensors: usize,
    /// Sensors with samples but no coordinate row
    pub unlocated_sensors: Vec<SensorId>,
    pub total_records: usize,
}

impl LoadReport {
    pub fn new(source: impl Into<String>, samples_path: PathBuf, coordinates_path: PathBuf) -> Self {
        Self {
            source: source.into(),
            samples_path,
            coordinates_path,
            sheets: Vec::new(),
            geocoded_sensors: 0,
            unlocated_sensors: Vec::new(),
            total_records: 0,
        }
    }

    pub fn loaded_variables(&self) -> Vec<&str> {
        self.sheets
            .iter()
            .filter(|s| s.is_loaded())
            .map(|s| s.sheet.as_str())
            .collect()
    }

    pub fn skipped(&self) -> Vec<(&str, &SkipReason)> {
        self.sheets
            .iter()
            .filter_map(|s| match &s.status {
                SheetStatus::Skipped { reason } => Some((s.sheet.as_str(), reason)),
                SheetStatus::Loaded { .. } => None,
            })
            .collect()
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!("=== Load Report: {} ===\n", self.source));
        summary.push_str(&format!("Samples: {}\n", self.samples_path.display()));
        summary.push_str(&format!("Coordinates: {}\n", self.coordinates_path.display()));
        summary.push_str(&format!("Geocoded sensors: {}\n", self.geocoded_sensors));
        summary.push_str(&format!("Consolidated records: {}\n", self.total_records));
        summary.push_str(&format!(
            "Sheets: {} loaded, {} skipped\n",
            self.loaded_variables().len(),
            self.skipped().len()
        ));

        for outcome in &self.sheets {
            match &outcome.status {
                SheetStatus::Loaded {
                    rows,
                    observations,
                    duplicates_removed,
                    dropped_columns,
                } => {
                    summary.push_str(&format!(
                        "  + {}: {} rows, {} observations",
                        outcome.sheet, rows, observations
                    ));
                    if *duplicates_removed > 0 {
                        summary.push_str(&format!(", {} duplicate ids replaced", duplicates_removed));
                    }
                    if !dropped_columns.is_empty() {
                        summary.push_str(&format!(", dropped {}", dropped_columns.join("/")));
                    }
                    summary.push('\n');
                }
                SheetStatus::Skipped { reason } => {
                    summary.push_str(&format!("  - {}: skipped, {}\n", outcome.sheet, reason));
                }
            }
        }

        if !self.unlocated_sensors.is_empty() {
            let ids: Vec<String> = self.unlocated_sensors.iter().map(|id| id.to_string()).collect();
            summary.push_str(&format!("Sensors without coordinates: {}\n", ids.join(", ")));
        }

        summary
    }
}
