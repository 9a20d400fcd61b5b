pub mod constants;
pub mod coordinates;
pub mod dates;
pub mod filename;
pub mod progress;
pub mod values;

pub use constants::*;
pub use coordinates::{utm_to_latlon, UtmZone};
pub use dates::{date_key, parse_sample_date};
pub use filename::generate_default_export_filename;
pub use progress::ProgressReporter;
pub use values::{correct_ocr_digits, normalize_value, normalize_value_or_zero, UnparseablePolicy};
