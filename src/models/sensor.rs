use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use validator::Validate;

use crate::error::Result;
use crate::models::CellValue;
use crate::utils::coordinates::{utm_to_latlon, UtmZone};

/// Identifier of a physical sampling location, the join key across all tables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(String);

impl SensorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// Build an id from a spreadsheet cell; blank cells have no id
    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        if cell.is_empty() {
            return None;
        }
        Some(Self::new(cell.as_label()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

// Numeric ids sort numerically and ahead of textual ids
impl Ord for SensorId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for SensorId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SensorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SensorCoordinate {
    pub id: SensorId,

    pub easting: f64,

    pub northing: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl SensorCoordinate {
    pub fn new(id: SensorId, easting: f64, northing: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            easting,
            northing,
            latitude,
            longitude,
        }
    }

    /// Geocode a projected position
    pub fn from_projected(id: SensorId, easting: f64, northing: f64, zone: UtmZone) -> Result<Self> {
        let (latitude, longitude) = utm_to_latlon(easting, northing, zone)?;
        let coordinate = Self::new(id, easting, northing, latitude, longitude);
        coordinate.validate()?;
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_id_from_cells() {
        assert_eq!(
            SensorId::from_cell(&CellValue::Number(101.0)),
            Some(SensorId::new("101"))
        );
        assert_eq!(
            SensorId::from_cell(&CellValue::from(" P-07 ")),
            Some(SensorId::new("P-07"))
        );
        assert_eq!(SensorId::from_cell(&CellValue::Empty), None);
    }

    #[test]
    fn test_natural_ordering() {
        let mut ids: Vec<SensorId> = ["10", "B", "2", "A", "1"]
            .iter()
            .map(|s| SensorId::new(*s))
            .collect();
        ids.sort();

        let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(sorted, vec!["1", "2", "10", "A", "B"]);
    }

    #[test]
    fn test_from_projected() {
        let coordinate = SensorCoordinate::from_projected(
            SensorId::new("7"),
            500_000.0,
            7_400_000.0,
            UtmZone::default(),
        )
        .unwrap();

        assert_eq!(coordinate.easting, 500_000.0);
        assert!((coordinate.latitude - -23.51019471479986).abs() < 1e-6);
        assert!((coordinate.longitude - -45.0).abs() < 1e-9);
        assert!(coordinate.validate().is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        let coordinate = SensorCoordinate::new(SensorId::new("1"), 0.0, 0.0, 91.0, 0.0);
        assert!(coordinate.validate().is_err());

        assert!(SensorCoordinate::from_projected(
            SensorId::new("1"),
            50.0,
            7_400_000.0,
            UtmZone::default()
        )
        .is_err());
    }
}
