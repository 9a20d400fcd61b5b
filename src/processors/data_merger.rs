use crate::error::Result;
use crate::models::{
    ConsolidatedRecord, ConsolidatedTable, SampleDate, SensorCoordinate, SensorId, SensorObservation,
};
use crate::utils::constants::SAMPLE_DATE_FORMAT;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Parsed dates join however their header was spelled; unparseable headers
/// stay apart by label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MergeKey {
    id: SensorId,
    date: SampleDate,
    label: String,
}

impl MergeKey {
    fn of(observation: &SensorObservation) -> Self {
        let label = match observation.date {
            SampleDate::Date(_) => String::new(),
            SampleDate::Missing => observation.date_label.clone(),
        };
        Self {
            id: observation.id.clone(),
            date: observation.date,
            label,
        }
    }

    fn date_label(&self) -> String {
        match self.date {
            SampleDate::Date(date) => date.format(SAMPLE_DATE_FORMAT).to_string(),
            SampleDate::Missing => self.label.clone(),
        }
    }
}

/// Outer-joins variables on (sensor id, sample date), then left-joins coordinates
pub struct DataMerger {
    variables: Vec<String>,
    rows: BTreeMap<MergeKey, Vec<Option<f64>>>,
}

impl DataMerger {
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Add one variable's observations as a new value column.
    ///
    /// Keys already present gain the new value (or a null); keys seen for the
    /// first time get nulls for every earlier variable.
    pub fn merge_variable(&mut self, variable: &str, observations: Vec<SensorObservation>) {
        for values in self.rows.values_mut() {
            values.push(None);
        }
        self.variables.push(variable.to_string());
        let width = self.variables.len();
        let column = width - 1;

        let mut new_keys = 0;
        for observation in observations {
            let values = self.rows.entry(MergeKey::of(&observation)).or_insert_with(|| {
                new_keys += 1;
                vec![None; width]
            });
            values[column] = observation.value;
        }

        debug!(
            "Merged variable '{}': {} new (sensor, date) keys, {} total",
            variable,
            new_keys,
            self.rows.len()
        );
    }

    /// Left join against geocoded sensors and produce the consolidated table
    pub fn join_coordinates(
        self,
        source: &str,
        coordinates: &BTreeMap<SensorId, SensorCoordinate>,
    ) -> Result<(ConsolidatedTable, Vec<SensorId>)> {
        let mut unlocated = BTreeSet::new();

        let records: Vec<ConsolidatedRecord> = self
            .rows
            .into_iter()
            .map(|(key, values)| {
                let label = key.date_label();
                let record = ConsolidatedRecord::new(key.id, label, key.date, values);
                match coordinates.get(&record.id) {
                    Some(coordinate) => record.with_coordinate(coordinate),
                    None => {
                        unlocated.insert(record.id.clone());
                        record
                    }
                }
            })
            .collect();

        let table = ConsolidatedTable::new(source, self.variables, records)?;
        Ok((table, unlocated.into_iter().collect()))
    }
}

impl Default for DataMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dates::parse_sample_date;

    fn obs(id: &str, variable: &str, label: &str, value: Option<f64>) -> SensorObservation {
        SensorObservation {
            id: SensorId::new(id),
            variable: variable.to_string(),
            date_label: label.to_string(),
            date: parse_sample_date(label),
            value,
        }
    }

    fn coordinates() -> BTreeMap<SensorId, SensorCoordinate> {
        let mut map = BTreeMap::new();
        map.insert(
            SensorId::new("1"),
            SensorCoordinate::new(SensorId::new("1"), 500_000.0, 7_400_000.0, -23.51, -45.0),
        );
        map
    }

    #[test]
    fn test_outer_merge_keeps_disjoint_dates() {
        let mut merger = DataMerger::new();
        merger.merge_variable("pH", vec![obs("1", "pH", "01_05_2015", Some(7.0))]);
        merger.merge_variable("CH4", vec![obs("1", "CH4", "02_05_2015", Some(0.3))]);

        let (table, _) = merger.join_coordinates("GEM", &coordinates()).unwrap();
        assert_eq!(table.len(), 2);

        let jan = &table.records()[0];
        assert_eq!(jan.values, vec![Some(7.0), None]);
        let feb = &table.records()[1];
        assert_eq!(feb.values, vec![None, Some(0.3)]);
    }

    #[test]
    fn test_shared_keys_merge_into_one_row() {
        let mut merger = DataMerger::new();
        merger.merge_variable(
            "pH",
            vec![
                obs("1", "pH", "01_05_2015", Some(7.0)),
                obs("2", "pH", "01_05_2015", None),
            ],
        );
        merger.merge_variable("CH4", vec![obs("2", "CH4", "01_05_2015", Some(0.1))]);

        let (table, unlocated) = merger.join_coordinates("GEM", &coordinates()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.variables(), &["pH".to_string(), "CH4".to_string()]);

        let second = &table.records()[1];
        assert_eq!(second.id, SensorId::new("2"));
        assert_eq!(second.values, vec![None, Some(0.1)]);
        assert!(!second.has_location());
        assert_eq!(unlocated, vec![SensorId::new("2")]);
    }

    #[test]
    fn test_left_join_populates_location() {
        let mut merger = DataMerger::new();
        merger.merge_variable("pH", vec![obs("1", "pH", "01_05_2015", Some(7.0))]);

        let (table, unlocated) = merger.join_coordinates("GEM", &coordinates()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.latitude, Some(-23.51));
        assert_eq!(record.longitude, Some(-45.0));
        assert_eq!(record.easting, Some(500_000.0));
        assert!(unlocated.is_empty());
    }

    #[test]
    fn test_unparseable_labels_keep_missing_date() {
        let mut merger = DataMerger::new();
        merger.merge_variable(
            "pH",
            vec![
                obs("1", "pH", "obs", Some(1.0)),
                obs("1", "pH", "01_05_2015", Some(7.0)),
            ],
        );

        let (table, _) = merger.join_coordinates("GEM", &coordinates()).unwrap();
        assert_eq!(table.records()[0].date_label, "01_05_2015");
        assert_eq!(table.records()[1].date, SampleDate::Missing);
    }

    #[test]
    fn test_differently_padded_headers_share_one_row() {
        let mut merger = DataMerger::new();
        merger.merge_variable("pH", vec![obs("1", "pH", "01_05_2015", Some(7.0))]);
        merger.merge_variable("CH4", vec![obs("1", "CH4", "1_5_2015", Some(0.3))]);

        let (table, _) = merger.join_coordinates("GEM", &coordinates()).unwrap();
        assert_eq!(table.len(), 1);

        let record = &table.records()[0];
        assert_eq!(record.date_label, "01_05_2015");
        assert_eq!(record.values, vec![Some(7.0), Some(0.3)]);
    }

    #[test]
    fn test_unparseable_labels_stay_apart() {
        let mut merger = DataMerger::new();
        merger.merge_variable("pH", vec![obs("1", "pH", "obs", Some(1.0))]);
        merger.merge_variable("CH4", vec![obs("1", "CH4", "notes", Some(2.0))]);

        let (table, _) = merger.join_coordinates("GEM", &coordinates()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.records().iter().all(|r| r.date == SampleDate::Missing));
    }
}
