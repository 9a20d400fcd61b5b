pub mod artifact;
pub mod csv_writer;
pub mod parquet_writer;

pub use artifact::DownloadArtifact;
pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};

/// Leading columns of every exported table
pub const FIXED_COLUMNS: [&str; 7] = [
    "id",
    "date",
    "date_label",
    "easting",
    "northing",
    "latitude",
    "longitude",
];

/// Exported column names: the fixed columns, then one per variable.
///
/// A variable whose name is already taken gets a `var_` prefix until it is
/// unique.
pub fn column_names(variables: &[String]) -> Vec<String> {
    let mut names: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    for variable in variables {
        let mut name = variable.clone();
        while names.contains(&name) {
            name = format!("var_{}", name);
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_keep_their_names() {
        let names = column_names(&["pH".to_string(), "CH4".to_string()]);
        assert_eq!(names.len(), 9);
        assert_eq!(&names[7..], &["pH".to_string(), "CH4".to_string()]);
    }

    #[test]
    fn test_colliding_variables_are_prefixed() {
        let names = column_names(&[
            "date".to_string(),
            "var_date".to_string(),
            "latitude".to_string(),
        ]);
        assert_eq!(
            &names[7..],
            &[
                "var_date".to_string(),
                "var_var_date".to_string(),
                "var_latitude".to_string()
            ]
        );
    }
}
