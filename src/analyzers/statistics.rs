use crate::error::{ProcessingError, Result};
use crate::models::{ConsolidatedRecord, ConsolidatedTable, Scope, SensorId};
use crate::utils::values::format_optional;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxReading {
    pub sensor_id: SensorId,
    pub value: f64,
}

/// Aggregates of one variable over one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub variable: String,
    pub scope: String,
    /// `None` when no scoped record holds a value
    pub mean: Option<f64>,
    pub distinct_sensor_count: usize,
    pub max: Option<MaxReading>,
    pub missing_count: usize,
    pub record_count: usize,
}

pub struct StatisticsSummarizer;

impl StatisticsSummarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(
        &self,
        table: &ConsolidatedTable,
        scope: &Scope,
        variable: &str,
    ) -> Result<StatisticsSummary> {
        let column = table.variable_index(variable)?;
        let records = table.scope(scope);

        if records.is_empty() {
            return Err(ProcessingError::EmptyScope(format!(
                "no {} records for {}",
                table.source(),
                scope
            )));
        }

        Ok(self.summarize_records(&records, column, variable, &scope.to_string()))
    }

    /// Statistics over records already filtered by the caller
    pub fn summarize_records(
        &self,
        records: &[&ConsolidatedRecord],
        column: usize,
        variable: &str,
        scope: &str,
    ) -> StatisticsSummary {
        let mut sensors = HashSet::new();
        let mut sum = 0.0;
        let mut present = 0usize;
        let mut missing_count = 0usize;
        let mut max: Option<MaxReading> = None;

        for record in records {
            sensors.insert(&record.id);

            match record.value(column) {
                Some(value) => {
                    sum += value;
                    present += 1;
                    if max.as_ref().map_or(true, |m| value > m.value) {
                        max = Some(MaxReading {
                            sensor_id: record.id.clone(),
                            value,
                        });
                    }
                }
                None => missing_count += 1,
            }
        }

        let mean = if present > 0 {
            Some(sum / present as f64)
        } else {
            None
        };

        StatisticsSummary {
            variable: variable.to_string(),
            scope: scope.to_string(),
            mean,
            distinct_sensor_count: sensors.len(),
            max,
            missing_count,
            record_count: records.len(),
        }
    }
}

impl Default for StatisticsSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsSummary {
    pub fn summary(&self) -> String {
        let (max_sensor, max_value) = match &self.max {
            Some(max) => (max.sensor_id.to_string(), format!("{:.2}", max.value)),
            None => ("n/a".to_string(), "n/a".to_string()),
        };

        format!(
            "Statistics for {} ({})\n\
            Mean: {}\n\
            Sensors: {}\n\
            Max: {} at sensor {}\n\
            Missing values: {}/{}",
            self.variable,
            self.scope,
            format_optional(self.mean),
            self.distinct_sensor_count,
            max_value,
            max_sensor,
            self.missing_count,
            self.record_count
        )
    }
}
