use crate::analyzers::{LineSeries, ScatterPoint};
use crate::error::Result;
use crate::models::ConsolidatedTable;
use crate::writers::column_names;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// CSV output for the consolidated table and the plot-ready views.
///
/// Missing values are written as empty fields.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_table_to_path(&self, table: &ConsolidatedTable, path: &Path) -> Result<()> {
        self.write_table(table, File::create(path)?)
    }

    pub fn write_table<W: Write>(&self, table: &ConsolidatedTable, out: W) -> Result<()> {
        let mut wtr = Writer::from_writer(out);

        let header = column_names(table.variables());
        wtr.write_record(&header)?;

        for record in table.records() {
            let mut row = vec![
                record.id.to_string(),
                record
                    .date
                    .date()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                record.date_label.clone(),
                optional(record.easting),
                optional(record.northing),
                optional(record.latitude),
                optional(record.longitude),
            ];
            row.extend(record.values.iter().map(|v| optional(*v)));
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_scatter<W: Write>(&self, points: &[ScatterPoint], out: W) -> Result<()> {
        let mut wtr = Writer::from_writer(out);
        for point in points {
            wtr.serialize(point)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_line<W: Write>(&self, series: &LineSeries, out: W) -> Result<()> {
        let mut wtr = Writer::from_writer(out);
        for point in &series.points {
            wtr.serialize(point)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::LinePoint;
    use crate::models::{ConsolidatedRecord, SampleDate, SensorId};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_csv() {
        let table = ConsolidatedTable::new(
            "MX6",
            vec!["pH".to_string()],
            vec![
                ConsolidatedRecord::new(
                    SensorId::new("3"),
                    "01_05_2015".to_string(),
                    SampleDate::Date(NaiveDate::from_ymd_opt(2015, 1, 5).unwrap()),
                    vec![Some(6.5)],
                ),
                ConsolidatedRecord::new(SensorId::new("3"), "x".to_string(), SampleDate::Missing, vec![None]),
            ],
        )
        .unwrap();

        let mut out = Vec::new();
        CsvWriter::new().write_table(&table, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,date,date_label,easting,northing,latitude,longitude,pH\n\
            3,2015-01-05,01_05_2015,,,,,6.5\n\
            3,,x,,,,,\n"
        );
    }

    #[test]
    fn test_variable_header_never_repeats_fixed_column() {
        let table = ConsolidatedTable::new(
            "GEM",
            vec!["id".to_string()],
            vec![ConsolidatedRecord::new(
                SensorId::new("1"),
                "x".to_string(),
                SampleDate::Missing,
                vec![Some(2.0)],
            )],
        )
        .unwrap();

        let mut out = Vec::new();
        CsvWriter::new().write_table(&table, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("id,date,date_label,easting,northing,latitude,longitude,var_id")
        );
    }

    #[test]
    fn test_scatter_csv() {
        let points = vec![ScatterPoint {
            longitude: -45.0,
            latitude: -23.5,
            value: None,
            id: SensorId::new("7"),
        }];

        let mut out = Vec::new();
        CsvWriter::new().write_scatter(&points, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "longitude,latitude,value,id\n-45.0,-23.5,,7\n"
        );
    }

    #[test]
    fn test_line_csv() {
        let series = LineSeries {
            sensor: SensorId::new("7"),
            variable: "pH".to_string(),
            points: vec![LinePoint {
                date: NaiveDate::from_ymd_opt(2015, 1, 5).unwrap(),
                value: Some(7.25),
                id: SensorId::new("7"),
            }],
            median_date: NaiveDate::from_ymd_opt(2015, 1, 5),
        };

        let mut out = Vec::new();
        CsvWriter::new().write_line(&series, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "date,value,id\n2015-01-05,7.25,7\n");
    }
}
