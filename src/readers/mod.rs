pub mod coordinate_reader;
pub mod sheet_reader;

pub use coordinate_reader::CoordinateReader;
pub use sheet_reader::SheetReader;
