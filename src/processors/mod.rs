pub mod consolidator;
pub mod data_merger;
pub mod load_report;
pub mod reshaper;
pub mod session_cache;

pub use consolidator::{Consolidator, LoadedSource};
pub use data_merger::DataMerger;
pub use load_report::{LoadReport, SheetOutcome, SheetStatus, SkipReason};
pub use reshaper::{ReshapedSheet, SheetReshaper};
pub use session_cache::{SessionCache, SourceFingerprint};
