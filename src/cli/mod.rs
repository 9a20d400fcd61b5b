pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ExportFormat};
pub use commands::run;
