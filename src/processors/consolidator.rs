use crate::config::SourceConfig;
use crate::error::{ProcessingError, Result};
use crate::models::ConsolidatedTable;
use crate::processors::{
    DataMerger, LoadReport, SheetOutcome, SheetReshaper, SheetStatus, SkipReason,
};
use crate::readers::{CoordinateReader, SheetReader};
use crate::utils::progress::ProgressReporter;
use std::time::Instant;
use tracing::{info, warn};

/// A consolidated table together with the report of how it was built
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub table: ConsolidatedTable,
    pub report: LoadReport,
}

/// Builds the consolidated table of one data source.
///
/// Every sheet of the samples workbook is treated as a variable. Sheets that
/// cannot be reshaped are skipped and listed in the [`LoadReport`]; a missing
/// input file or a failed coordinate conversion aborts the whole load.
pub struct Consolidator {
    source: SourceConfig,
}

impl Consolidator {
    pub fn new(source: SourceConfig) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    pub fn consolidate(&self, progress: Option<&ProgressReporter>) -> Result<LoadedSource> {
        let start = Instant::now();
        let source = &self.source;

        for path in source.input_files() {
            if !path.exists() {
                return Err(ProcessingError::MissingSourceFile(path.to_path_buf()));
            }
        }

        info!("Consolidating source {}", source.name);

        let coordinate_reader = CoordinateReader::new(
            source.coordinates.sheet.clone(),
            source.coordinates.header_row,
            source.coordinates.zone()?,
        );
        let coordinates = coordinate_reader.read_coordinates_map(&source.coordinates.path)?;

        let mut workbook = SheetReader::open(&source.samples)?;
        let sheet_names = workbook.sheet_names();
        if let Some(pb) = progress {
            pb.set_length(sheet_names.len() as u64);
        }

        let reshaper = SheetReshaper::new()
            .with_excluded_columns(source.excluded_columns.clone())
            .with_policy(source.unparseable);

        let mut report = LoadReport::new(
            source.name.clone(),
            source.samples.clone(),
            source.coordinates.path.clone(),
        );
        let mut merger = DataMerger::new();

        for name in sheet_names {
            if let Some(pb) = progress {
                pb.set_message(&format!("Reading sheet {}", name));
            }

            let reshaped = workbook
                .read_sheet(&name, 0)
                .map_err(|e| SkipReason::Unreadable(e.to_string()))
                .and_then(|sheet| reshaper.reshape(&sheet));

            let status = match reshaped {
                Ok(reshaped) => {
                    let status = SheetStatus::Loaded {
                        rows: reshaped.rows,
                        observations: reshaped.observations.len(),
                        duplicates_removed: reshaped.duplicates_removed,
                        dropped_columns: reshaped.dropped_columns,
                    };
                    merger.merge_variable(&reshaped.variable, reshaped.observations);
                    status
                }
                Err(reason) => {
                    warn!("Skipping sheet '{}' of {}: {}", name, source.name, reason);
                    if let Some(pb) = progress {
                        pb.println(&format!("Sheet '{}' skipped: {}", name, reason));
                    }
                    SheetStatus::Skipped { reason }
                }
            };

            report.sheets.push(SheetOutcome { sheet: name, status });

            if let Some(pb) = progress {
                pb.increment(1);
            }
        }

        if merger.is_empty() {
            return Err(ProcessingError::NoVariablesLoaded(source.samples.clone()));
        }

        let (table, unlocated) = merger.join_coordinates(&source.name, &coordinates)?;

        if !unlocated.is_empty() {
            warn!(
                "{} sensors of {} have no coordinates",
                unlocated.len(),
                source.name
            );
        }

        report.geocoded_sensors = coordinates.len();
        report.unlocated_sensors = unlocated;
        report.total_records = table.len();

        info!(
            "Consolidated {}: {} records, {} variables in {:.2}s",
            source.name,
            table.len(),
            table.variables().len(),
            start.elapsed().as_secs_f64()
        );

        Ok(LoadedSource { table, report })
    }
}
