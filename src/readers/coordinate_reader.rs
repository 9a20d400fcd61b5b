use crate::error::{ProcessingError, Result};
use crate::models::{CellValue, RawSheet, SensorCoordinate, SensorId};
use crate::readers::SheetReader;
use crate::utils::constants::{EASTING_COLUMN, ID_COLUMN, NORTHING_COLUMN};
use crate::utils::coordinates::UtmZone;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads the sensor position sheet and geocodes every row
pub struct CoordinateReader {
    sheet_name: String,
    header_row: usize,
    zone: UtmZone,
}

impl CoordinateReader {
    pub fn new(sheet_name: impl Into<String>, header_row: usize, zone: UtmZone) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            header_row,
            zone,
        }
    }

    pub fn read_coordinates(&self, path: &Path) -> Result<Vec<SensorCoordinate>> {
        let mut reader = SheetReader::open(path)?;
        let sheet = reader.read_sheet(&self.sheet_name, self.header_row)?;
        let coordinates = self.parse_sheet(&sheet)?;

        info!(
            "Geocoded {} sensors from {} (zone {})",
            coordinates.len(),
            path.display(),
            self.zone
        );
        Ok(coordinates)
    }

    /// Coordinates keyed by sensor id
    pub fn read_coordinates_map(&self, path: &Path) -> Result<BTreeMap<SensorId, SensorCoordinate>> {
        Ok(self
            .read_coordinates(path)?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect())
    }

    /// Convert every row of a coordinates sheet.
    ///
    /// Blank ids are skipped. A repeated id keeps its last row. Any conversion
    /// failure aborts with [`ProcessingError::GeodeticConversion`].
    pub fn parse_sheet(&self, sheet: &RawSheet) -> Result<Vec<SensorCoordinate>> {
        let id_col = self.require_column(sheet, ID_COLUMN)?;
        let x_col = self.require_column(sheet, EASTING_COLUMN)?;
        let y_col = self.require_column(sheet, NORTHING_COLUMN)?;

        let mut by_id: BTreeMap<SensorId, SensorCoordinate> = BTreeMap::new();

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let id = match SensorId::from_cell(&row[id_col]) {
                Some(id) => id,
                None => {
                    debug!("Skipping coordinate row {} without id", row_idx);
                    continue;
                }
            };

            let easting = projected_value(&row[x_col], &id, EASTING_COLUMN)?;
            let northing = projected_value(&row[y_col], &id, NORTHING_COLUMN)?;

            let coordinate = SensorCoordinate::from_projected(id.clone(), easting, northing, self.zone)
                .map_err(|e| {
                    ProcessingError::GeodeticConversion(format!("sensor {}: {}", id, e))
                })?;

            if by_id.insert(id.clone(), coordinate).is_some() {
                warn!("Sensor {} listed twice in coordinates, keeping the last row", id);
            }
        }

        Ok(by_id.into_values().collect())
    }

    fn require_column(&self, sheet: &RawSheet, column: &str) -> Result<usize> {
        sheet
            .column_index(column)
            .ok_or_else(|| ProcessingError::MissingColumn {
                sheet: sheet.name.clone(),
                column: column.to_string(),
            })
    }
}

fn projected_value(cell: &CellValue, id: &SensorId, column: &str) -> Result<f64> {
    match cell {
        CellValue::Number(n) => Ok(*n),
        CellValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().map_err(|_| {
            ProcessingError::GeodeticConversion(format!(
                "sensor {}: invalid {} value '{}'",
                id, column, s
            ))
        }),
        other => Err(ProcessingError::GeodeticConversion(format!(
            "sensor {}: missing {} value ({:?})",
            id, column, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: Vec<Vec<CellValue>>) -> RawSheet {
        RawSheet::new("Coordenadas", vec!["id".into(), "x".into(), "y".into()], rows)
    }

    #[test]
    fn test_parse_coordinates() {
        let reader = CoordinateReader::new("Coordenadas", 1, UtmZone::default());
        let coordinates = reader
            .parse_sheet(&sheet(vec![
                vec![2.0.into(), 612345.0.into(), 7801234.0.into()],
                vec![1.0.into(), "500000".into(), "7400000,0".into()],
                vec![CellValue::Empty, 1.0.into(), 1.0.into()],
            ]))
            .unwrap();

        assert_eq!(coordinates.len(), 2);
        assert_eq!(coordinates[0].id, SensorId::new("1"));
        assert!((coordinates[0].longitude - -45.0).abs() < 1e-9);
        assert!((coordinates[1].latitude - -19.881861333298726).abs() < 1e-6);
    }

    #[test]
    fn test_duplicate_ids_keep_last() {
        let reader = CoordinateReader::new("Coordenadas", 1, UtmZone::default());
        let coordinates = reader
            .parse_sheet(&sheet(vec![
                vec![1.0.into(), 612345.0.into(), 7801234.0.into()],
                vec![1.0.into(), 500000.0.into(), 7400000.0.into()],
            ]))
            .unwrap();

        assert_eq!(coordinates.len(), 1);
        assert_eq!(coordinates[0].easting, 500000.0);
    }

    #[test]
    fn test_conversion_failure_aborts() {
        let reader = CoordinateReader::new("Coordenadas", 1, UtmZone::default());
        let result = reader.parse_sheet(&sheet(vec![
            vec![1.0.into(), 500000.0.into(), 7400000.0.into()],
            vec![2.0.into(), CellValue::Empty, 7400000.0.into()],
        ]));
        assert!(matches!(result, Err(ProcessingError::GeodeticConversion(_))));

        let result = reader.parse_sheet(&sheet(vec![vec![1.0.into(), 12.0.into(), 7400000.0.into()]]));
        assert!(matches!(result, Err(ProcessingError::GeodeticConversion(_))));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let reader = CoordinateReader::new("Coordenadas", 1, UtmZone::default());
        let sheet = RawSheet::new("Coordenadas", vec!["id".into(), "x".into()], vec![]);
        assert!(matches!(
            reader.parse_sheet(&sheet),
            Err(ProcessingError::MissingColumn { .. })
        ));
    }
}
