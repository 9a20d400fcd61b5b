use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Default export path: `output/{source}-consolidated-{YYMMDD}.{extension}`
pub fn generate_default_export_filename(source: &str, extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "{}-consolidated-{:02}{:02}{:02}.{}",
        sanitize(source),
        year,
        month,
        day,
        extension
    );
    PathBuf::from("output").join(filename)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
