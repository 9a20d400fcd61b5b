use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{ProcessingError, Result};
use crate::models::{SampleDate, SensorCoordinate, SensorId};

/// One (sensor, date) row with a value slot per variable of the owning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecord {
    pub id: SensorId,
    pub date: SampleDate,
    pub date_label: String,
    pub easting: Option<f64>,
    pub northing: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub values: Vec<Option<f64>>,
}

impl ConsolidatedRecord {
    pub fn new(id: SensorId, date_label: String, date: SampleDate, values: Vec<Option<f64>>) -> Self {
        Self {
            id,
            date,
            date_label,
            easting: None,
            northing: None,
            latitude: None,
            longitude: None,
            values,
        }
    }

    pub fn with_coordinate(mut self, coordinate: &SensorCoordinate) -> Self {
        self.easting = Some(coordinate.easting);
        self.northing = Some(coordinate.northing);
        self.latitude = Some(coordinate.latitude);
        self.longitude = Some(coordinate.longitude);
        self
    }

    pub fn value(&self, column: usize) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }

    pub fn has_location(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Subset of a consolidated table that views and statistics operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Date(SampleDate),
    Sensor(SensorId),
}

impl Scope {
    pub fn contains(&self, record: &ConsolidatedRecord) -> bool {
        match self {
            Scope::All => true,
            Scope::Date(date) => record.date == *date,
            Scope::Sensor(id) => record.id == *id,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::All => write!(f, "all records"),
            Scope::Date(date) => write!(f, "date {}", date),
            Scope::Sensor(id) => write!(f, "sensor {}", id),
        }
    }
}

/// Long-format table of one data source, sorted by (id, date, date label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedTable {
    source: String,
    variables: Vec<String>,
    records: Vec<ConsolidatedRecord>,
}

impl ConsolidatedTable {
    pub fn new(
        source: impl Into<String>,
        variables: Vec<String>,
        mut records: Vec<ConsolidatedRecord>,
    ) -> Result<Self> {
        if let Some(record) = records.iter().find(|r| r.values.len() != variables.len()) {
            return Err(ProcessingError::InvalidFormat(format!(
                "Record for sensor {} has {} values, table has {} variables",
                record.id,
                record.values.len(),
                variables.len()
            )));
        }

        records.sort_by(|a, b| {
            a.id.cmp(&b.id)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.date_label.cmp(&b.date_label))
        });

        Ok(Self {
            source: source.into(),
            variables,
            records,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Variables in workbook sheet order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Variables sorted by name, as offered by selectors
    pub fn sorted_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.iter().map(|v| v.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn records(&self) -> &[ConsolidatedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn variable_index(&self, variable: &str) -> Result<usize> {
        self.variables
            .iter()
            .position(|v| v == variable)
            .ok_or_else(|| ProcessingError::UnknownVariable(variable.to_string()))
    }

    pub fn value(&self, record: &ConsolidatedRecord, variable: &str) -> Result<Option<f64>> {
        Ok(record.value(self.variable_index(variable)?))
    }

    /// Distinct sensor ids in natural order
    pub fn sensor_ids(&self) -> Vec<&SensorId> {
        self.records
            .iter()
            .map(|r| &r.id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct parsed sample dates, missing dates excluded
    pub fn sample_dates(&self) -> Vec<NaiveDate> {
        self.records
            .iter()
            .filter_map(|r| r.date.date())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn scope(&self, scope: &Scope) -> Vec<&ConsolidatedRecord> {
        self.records.iter().filter(|r| scope.contains(r)).collect()
    }

    pub fn located_count(&self) -> usize {
        self.records.iter().filter(|r| r.has_location()).count()
    }

    pub fn summary(&self) -> String {
        let dates = self.sample_dates();
        let date_range = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => format!("{} to {}", first, last),
            _ => "no valid dates".to_string(),
        };

        format!(
            "Source: {}\n\
            Records: {}\n\
            Sensors: {}\n\
            Sample dates: {} ({})\n\
            Variables: {}\n\
            Located records: {}/{}",
            self.source,
            self.records.len(),
            self.sensor_ids().len(),
            dates.len(),
            date_range,
            self.variables.join(", "),
            self.located_count(),
            self.records.len()
        )
    }
}
