use crate::models::{RawSheet, SensorId, SensorObservation};
use crate::processors::SkipReason;
use crate::utils::constants::{DEFAULT_EXCLUDED_COLUMNS, ID_COLUMN};
use crate::utils::dates::{date_key, header_label, parse_sample_date};
use crate::utils::values::UnparseablePolicy;
use std::collections::HashMap;
use tracing::debug;

/// A variable sheet turned into long-format observations
#[derive(Debug, Clone)]
pub struct ReshapedSheet {
    pub variable: String,
    pub observations: Vec<SensorObservation>,
    /// Rows kept after deduplication
    pub rows: usize,
    pub duplicates_removed: usize,
    pub dropped_columns: Vec<String>,
}

/// Wide-to-long conversion of one variable sheet
pub struct SheetReshaper {
    excluded_columns: Vec<String>,
    policy: UnparseablePolicy,
}

impl SheetReshaper {
    pub fn new() -> Self {
        Self {
            excluded_columns: DEFAULT_EXCLUDED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            policy: UnparseablePolicy::default(),
        }
    }

    pub fn with_excluded_columns(mut self, columns: Vec<String>) -> Self {
        self.excluded_columns = columns;
        self
    }

    pub fn with_policy(mut self, policy: UnparseablePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reshape a sheet named after its variable.
    ///
    /// Rows sharing an id keep only the last one. Excluded and blank-header
    /// columns are ignored; every remaining column is a sampling date.
    pub fn reshape(&self, sheet: &RawSheet) -> Result<ReshapedSheet, SkipReason> {
        let id_col = sheet
            .column_index(ID_COLUMN)
            .ok_or_else(|| SkipReason::MissingColumn(ID_COLUMN.to_string()))?;

        let (kept_rows, duplicates_removed) = self.deduplicate(sheet, id_col);

        let mut dropped_columns = Vec::new();
        let mut date_columns = Vec::new();
        for (col, header) in sheet.headers.iter().enumerate() {
            if col == id_col {
                continue;
            }
            let label = header_label(header);
            if label.is_empty() {
                debug!("Sheet '{}': ignoring column {} without header", sheet.name, col);
                continue;
            }
            if self.excluded_columns.iter().any(|c| *c == label) {
                dropped_columns.push(label);
                continue;
            }
            date_columns.push((col, date_key(&label)));
        }

        // Column-major, like a melt: all sensors of the first date, then the next
        let mut observations = Vec::with_capacity(date_columns.len() * kept_rows.len());
        for (col, label) in &date_columns {
            let date = parse_sample_date(label);
            for (id, row) in &kept_rows {
                observations.push(SensorObservation {
                    id: id.clone(),
                    variable: sheet.name.clone(),
                    date_label: label.clone(),
                    date,
                    value: self.policy.apply(&sheet.rows[*row][*col]),
                });
            }
        }

        debug!(
            "Sheet '{}': {} sensors x {} dates, {} duplicates removed",
            sheet.name,
            kept_rows.len(),
            date_columns.len(),
            duplicates_removed
        );

        Ok(ReshapedSheet {
            variable: sheet.name.clone(),
            observations,
            rows: kept_rows.len(),
            duplicates_removed,
            dropped_columns,
        })
    }

    /// Row indices that survive keep-last deduplication, in sheet order
    fn deduplicate(&self, sheet: &RawSheet, id_col: usize) -> (Vec<(SensorId, usize)>, usize) {
        let ids: Vec<Option<SensorId>> = sheet
            .rows
            .iter()
            .map(|row| SensorId::from_cell(&row[id_col]))
            .collect();

        let mut last_row: HashMap<&SensorId, usize> = HashMap::new();
        for (row, id) in ids.iter().enumerate() {
            if let Some(id) = id {
                last_row.insert(id, row);
            }
        }

        let with_id = ids.iter().filter(|id| id.is_some()).count();
        let kept: Vec<(SensorId, usize)> = ids
            .iter()
            .enumerate()
            .filter_map(|(row, id)| match id {
                Some(id) if last_row.get(id) == Some(&row) => Some((id.clone(), row)),
                _ => None,
            })
            .collect();

        let duplicates_removed = with_id - kept.len();
        (kept, duplicates_removed)
    }
}

impl Default for SheetReshaper {
    fn default() -> Self {
        Self::new()
    }
}
