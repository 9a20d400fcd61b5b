use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::SensorId;

/// Sampling date of a column; `Missing` sorts after every real date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SampleDate {
    Date(NaiveDate),
    Missing,
}

impl SampleDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            SampleDate::Date(date) => Some(*date),
            SampleDate::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SampleDate::Missing)
    }
}

impl From<NaiveDate> for SampleDate {
    fn from(date: NaiveDate) -> Self {
        SampleDate::Date(date)
    }
}

impl std::fmt::Display for SampleDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleDate::Date(date) => write!(f, "{}", date),
            SampleDate::Missing => write!(f, "missing"),
        }
    }
}

/// One reshaped cell of a variable sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorObservation {
    pub id: SensorId,
    pub variable: String,
    /// Column header with whitespace removed
    pub date_label: String,
    pub date: SampleDate,
    pub value: Option<f64>,
}
