use crate::error::{ProcessingError, Result};
use crate::models::{ConsolidatedTable, SampleDate, Scope, SensorId};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// One sensor on the map for a given date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub value: Option<f64>,
    pub id: SensorId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub id: SensorId,
}

/// Time series of one sensor, with the median sampling date as reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub sensor: SensorId,
    pub variable: String,
    pub points: Vec<LinePoint>,
    pub median_date: Option<NaiveDate>,
}

/// Scatter view of `variable` on `date`; sensors without a location are left out
pub fn scatter_points(
    table: &ConsolidatedTable,
    date: NaiveDate,
    variable: &str,
) -> Result<Vec<ScatterPoint>> {
    let column = table.variable_index(variable)?;
    let scoped = table.scope(&Scope::Date(SampleDate::Date(date)));
    if scoped.is_empty() {
        return Err(ProcessingError::EmptyScope(format!("no samples on {}", date)));
    }

    Ok(scoped
        .into_iter()
        .filter_map(|record| match (record.longitude, record.latitude) {
            (Some(longitude), Some(latitude)) => Some(ScatterPoint {
                longitude,
                latitude,
                value: record.value(column),
                id: record.id.clone(),
            }),
            _ => None,
        })
        .collect())
}

/// Line view of `variable` for one sensor, sorted by date; missing dates are left out
pub fn line_series(table: &ConsolidatedTable, sensor: &SensorId, variable: &str) -> Result<LineSeries> {
    let column = table.variable_index(variable)?;
    let scoped = table.scope(&Scope::Sensor(sensor.clone()));
    if scoped.is_empty() {
        return Err(ProcessingError::EmptyScope(format!("no samples for sensor {}", sensor)));
    }

    let mut points: Vec<LinePoint> = scoped
        .into_iter()
        .filter_map(|record| {
            record.date.date().map(|date| LinePoint {
                date,
                value: record.value(column),
                id: record.id.clone(),
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);

    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();

    Ok(LineSeries {
        sensor: sensor.clone(),
        variable: variable.to_string(),
        median_date: median_date(&dates),
        points,
    })
}

/// Median of sorted dates; an even count takes the midpoint of the middle pair, floored to a day
pub fn median_date(sorted: &[NaiveDate]) -> Option<NaiveDate> {
    if sorted.is_empty() {
        return None;
    }

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        return Some(sorted[mid]);
    }

    let (low, high) = (sorted[mid - 1], sorted[mid]);
    let half = (high - low).num_days().div_euclid(2);
    Some(low + Duration::days(half))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsolidatedRecord, SensorCoordinate};
    use pretty_assertions::assert_eq;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, m, d).unwrap()
    }

    fn table() -> ConsolidatedTable {
        let located = SensorCoordinate::new(SensorId::new("1"), 500_000.0, 7_400_000.0, -23.5, -45.0);
        let records = vec![
            ConsolidatedRecord::new(SensorId::new("1"), "03_02_2015".into(), SampleDate::Date(day(3, 2)), vec![Some(2.0)])
                .with_coordinate(&located),
            ConsolidatedRecord::new(SensorId::new("1"), "01_05_2015".into(), SampleDate::Date(day(1, 5)), vec![Some(1.0)])
                .with_coordinate(&located),
            ConsolidatedRecord::new(SensorId::new("1"), "obs".into(), SampleDate::Missing, vec![Some(9.0)])
                .with_coordinate(&located),
            ConsolidatedRecord::new(SensorId::new("7"), "01_05_2015".into(), SampleDate::Date(day(1, 5)), vec![None]),
        ];
        ConsolidatedTable::new("GEM", vec!["pH".to_string()], records).unwrap()
    }

    #[test]
    fn test_scatter_skips_unlocated() {
        let points = scatter_points(&table(), day(1, 5), "pH").unwrap();
        assert_eq!(
            points,
            vec![ScatterPoint {
                longitude: -45.0,
                latitude: -23.5,
                value: Some(1.0),
                id: SensorId::new("1"),
            }]
        );
    }

    #[test]
    fn test_scatter_unknown_date() {
        let result = scatter_points(&table(), day(6, 1), "pH");
        assert!(matches!(result, Err(ProcessingError::EmptyScope(_))));
    }

    #[test]
    fn test_line_series_sorted_by_date() {
        let series = line_series(&table(), &SensorId::new("1"), "pH").unwrap();
        let dates: Vec<NaiveDate> = series.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(1, 5), day(3, 2)]);
        assert_eq!(series.median_date, Some(day(2, 2)));
    }

    #[test]
    fn test_median_date() {
        assert_eq!(median_date(&[]), None);
        assert_eq!(median_date(&[day(1, 5)]), Some(day(1, 5)));
        assert_eq!(median_date(&[day(1, 5), day(1, 8), day(2, 1)]), Some(day(1, 8)));
        assert_eq!(median_date(&[day(1, 5), day(1, 8)]), Some(day(1, 6)));
    }

    #[test]
    fn test_line_unknown_sensor() {
        let result = line_series(&table(), &SensorId::new("99"), "pH");
        assert!(matches!(result, Err(ProcessingError::EmptyScope(_))));
    }
}
