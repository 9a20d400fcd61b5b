use crate::models::{CellValue, SampleDate};
use crate::utils::constants::SAMPLE_DATE_FORMAT;
use chrono::NaiveDate;

/// Strip every whitespace character from a date column header
pub fn date_key(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse a `MM_DD_YYYY` column header; malformed headers yield [`SampleDate::Missing`]
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use sensor_dashboard::models::SampleDate;
/// use sensor_dashboard::utils::dates::parse_sample_date;
///
/// let expected = SampleDate::Date(NaiveDate::from_ymd_opt(2015, 1, 15).unwrap());
/// assert_eq!(parse_sample_date("01 _ 15_2015"), expected);
/// assert_eq!(parse_sample_date("not-a-date"), SampleDate::Missing);
/// ```
pub fn parse_sample_date(label: &str) -> SampleDate {
    match NaiveDate::parse_from_str(&date_key(label), SAMPLE_DATE_FORMAT) {
        Ok(date) => SampleDate::Date(date),
        Err(_) => SampleDate::Missing,
    }
}

/// Render a header cell as a date label.
///
/// Headers stored as real spreadsheet dates are written in the same
/// `MM_DD_YYYY` form as typed headers.
pub fn header_label(cell: &CellValue) -> String {
    match cell {
        CellValue::DateTime(dt) => dt.date().format(SAMPLE_DATE_FORMAT).to_string(),
        other => other.as_label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> SampleDate {
        SampleDate::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_parse_fixed_pattern() {
        assert_eq!(parse_sample_date("01_15_2015"), date(2015, 1, 15));
        assert_eq!(parse_sample_date("12_31_2014"), date(2014, 12, 31));
    }

    #[test]
    fn test_embedded_whitespace() {
        assert_eq!(parse_sample_date("01 _ 15_2015"), date(2015, 1, 15));
        assert_eq!(parse_sample_date(" 03_02_ 2015 "), date(2015, 3, 2));
    }

    #[test]
    fn test_malformed_is_missing() {
        assert_eq!(parse_sample_date("not-a-date"), SampleDate::Missing);
        assert_eq!(parse_sample_date("2015-01-15"), SampleDate::Missing);
        assert_eq!(parse_sample_date("13_01_2015"), SampleDate::Missing);
        assert_eq!(parse_sample_date(""), SampleDate::Missing);
    }

    #[test]
    fn test_date_key() {
        assert_eq!(date_key("01 _ 15_2015"), "01_15_2015");
        assert_eq!(date_key("\t02_01_2015\n"), "02_01_2015");
    }

    #[test]
    fn test_datetime_header_label() {
        let dt = NaiveDate::from_ymd_opt(2015, 1, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(header_label(&CellValue::DateTime(dt)), "01_05_2015");
        assert_eq!(header_label(&CellValue::from(" 01_05_2015 ")), "01_05_2015");
    }
}
