pub mod cell;
pub mod consolidated;
pub mod observation;
pub mod sensor;
pub mod sheet;

pub use cell::CellValue;
pub use consolidated::{ConsolidatedRecord, ConsolidatedTable, Scope};
pub use observation::{SampleDate, SensorObservation};
pub use sensor::{SensorCoordinate, SensorId};
pub use sheet::RawSheet;
