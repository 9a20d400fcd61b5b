pub mod statistics;
pub mod views;

pub use statistics::{MaxReading, StatisticsSummarizer, StatisticsSummary};
pub use views::{line_series, median_date, scatter_points, LinePoint, LineSeries, ScatterPoint};
