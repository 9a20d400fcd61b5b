use crate::utils::constants::{COMPRESSION_SNAPPY, DEFAULT_CHUNK_SIZE};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sensor-dashboard")]
#[command(about = "Consolidate sensor sampling spreadsheets into geolocated tables and statistics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Configuration file [default: dashboard.toml if present]")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Parquet,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Parquet => "parquet",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured data sources
    Sources,

    /// Consolidate a source and print its load report
    Load {
        #[arg(short, long)]
        source: String,
    },

    /// Map-ready values of one variable on one sampling date
    Scatter {
        #[arg(short, long)]
        source: String,

        #[arg(long)]
        variable: String,

        #[arg(short, long, help = "Sampling date as MM_DD_YYYY")]
        date: String,

        #[arg(long, help = "Write the points as CSV instead of printing them")]
        output: Option<PathBuf>,
    },

    /// Time series of one variable for one sensor
    Line {
        #[arg(short, long)]
        source: String,

        #[arg(long)]
        variable: String,

        #[arg(long)]
        sensor: String,

        #[arg(long, help = "Write the series as CSV instead of printing it")]
        output: Option<PathBuf>,
    },

    /// Statistics of one variable over a date, a sensor, or everything
    Stats {
        #[arg(short, long)]
        source: String,

        #[arg(long)]
        variable: String,

        #[arg(short, long, conflicts_with = "sensor", help = "Sampling date as MM_DD_YYYY")]
        date: Option<String>,

        #[arg(long)]
        sensor: Option<String>,
    },

    /// Show a variable sheet as read from the samples workbook
    Sheet {
        #[arg(short, long)]
        source: String,

        #[arg(long)]
        variable: String,

        #[arg(long, default_value = "20", help = "Rows to show (0 = all)")]
        rows: usize,
    },

    /// Write the consolidated table to Parquet or CSV
    Export {
        #[arg(short, long)]
        source: String,

        #[arg(
            short,
            long,
            help = "Output file path [default: output/{source}-consolidated-{YYMMDD}.{ext}]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "parquet")]
        format: ExportFormat,

        #[arg(short, long, default_value = COMPRESSION_SNAPPY)]
        compression: String,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },

    /// Save the source's downloadable data file
    Download {
        #[arg(short, long)]
        source: String,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Display information about a Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats() {
        let cli = Cli::try_parse_from([
            "sensor-dashboard",
            "stats",
            "--source",
            "GEM",
            "--variable",
            "pH",
            "--date",
            "01_05_2015",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Stats {
                source,
                variable,
                date,
                sensor,
            } => {
                assert_eq!(source, "GEM");
                assert_eq!(variable, "pH");
                assert_eq!(date.as_deref(), Some("01_05_2015"));
                assert!(sensor.is_none());
            }
            _ => panic!("expected stats command"),
        }
    }

    #[test]
    fn test_date_and_sensor_conflict() {
        let result = Cli::try_parse_from([
            "sensor-dashboard",
            "stats",
            "-s",
            "GEM",
            "--variable",
            "pH",
            "--date",
            "01_05_2015",
            "--sensor",
            "3",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::try_parse_from(["sensor-dashboard", "export", "-s", "MX6"]).unwrap();
        match cli.command {
            Commands::Export {
                format,
                compression,
                output,
                ..
            } => {
                assert_eq!(format, ExportFormat::Parquet);
                assert_eq!(compression, "snappy");
                assert!(output.is_none());
            }
            _ => panic!("expected export command"),
        }
    }
}
