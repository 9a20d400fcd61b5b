use crate::analyzers::{line_series, scatter_points, StatisticsSummarizer};
use crate::cli::args::{Cli, Commands, ExportFormat};
use crate::config::{DashboardConfig, SourceConfig};
use crate::models::{RawSheet, SampleDate, Scope, SensorId};
use crate::processors::{LoadedSource, SessionCache};
use crate::readers::SheetReader;
use crate::utils::dates::parse_sample_date;
use crate::utils::filename::generate_default_export_filename;
use crate::utils::progress::ProgressReporter;
use crate::utils::values::format_optional;
use crate::writers::{CsvWriter, DownloadArtifact, ParquetWriter};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone();
    let load_config = || {
        DashboardConfig::load(config_path.as_deref())
            .context("Failed to load dashboard configuration")
    };
    let cache = SessionCache::new();

    match cli.command {
        Commands::Sources => {
            for source in &load_config()?.sources {
                print_source(source);
            }
        }

        Commands::Load { source } => {
            let config = load_config()?;
            let source = config.source(&source)?;
            let loaded = load_source(&cache, source)?;

            println!("\n{}", loaded.report.generate_summary());
            println!("{}", loaded.table.summary());
        }

        Commands::Scatter {
            source,
            variable,
            date,
            output,
        } => {
            let config = load_config()?;
            let source = config.source(&source)?;
            let date = parse_date_argument(&date)?;
            let loaded = load_source(&cache, source)?;
            let table = &loaded.table;

            let points = scatter_points(table, date, &variable)?;
            let stats = StatisticsSummarizer::new().summarize(
                table,
                &Scope::Date(SampleDate::Date(date)),
                &variable,
            )?;

            match output {
                Some(path) => {
                    CsvWriter::new().write_scatter(&points, create_output(&path)?)?;
                    println!("Wrote {} points to {}", points.len(), path.display());
                }
                None => {
                    println!("{:>10} {:>12} {:>12} {:>10}", "id", "longitude", "latitude", &variable);
                    for point in &points {
                        println!(
                            "{:>10} {:>12.6} {:>12.6} {:>10}",
                            point.id,
                            point.longitude,
                            point.latitude,
                            format_optional(point.value)
                        );
                    }
                }
            }

            println!("\n{}", stats.summary());
        }

        Commands::Line {
            source,
            variable,
            sensor,
            output,
        } => {
            let config = load_config()?;
            let source = config.source(&source)?;
            let sensor = SensorId::new(sensor);
            let loaded = load_source(&cache, source)?;
            let table = &loaded.table;

            let series = line_series(table, &sensor, &variable)?;
            let stats = StatisticsSummarizer::new().summarize(
                table,
                &Scope::Sensor(sensor.clone()),
                &variable,
            )?;

            match output {
                Some(path) => {
                    CsvWriter::new().write_line(&series, create_output(&path)?)?;
                    println!("Wrote {} points to {}", series.points.len(), path.display());
                }
                None => {
                    println!("{:>12} {:>10}", "date", &variable);
                    for point in &series.points {
                        println!("{:>12} {:>10}", point.date, format_optional(point.value));
                    }
                }
            }

            if let Some(median) = series.median_date {
                println!("\nMedian sampling date: {}", median);
            }
            println!("\n{}", stats.summary());
        }

        Commands::Stats {
            source,
            variable,
            date,
            sensor,
        } => {
            let config = load_config()?;
            let source = config.source(&source)?;
            let scope = match (date, sensor) {
                (Some(date), _) => Scope::Date(SampleDate::Date(parse_date_argument(&date)?)),
                (None, Some(sensor)) => Scope::Sensor(SensorId::new(sensor)),
                (None, None) => Scope::All,
            };

            let loaded = load_source(&cache, source)?;
            let stats = StatisticsSummarizer::new().summarize(&loaded.table, &scope, &variable)?;
            println!("{}", stats.summary());
        }

        Commands::Sheet {
            source,
            variable,
            rows,
        } => {
            let config = load_config()?;
            let source = config.source(&source)?;
            let mut reader = SheetReader::open(&source.samples)?;
            let sheet = reader.read_sheet(&variable, 0)?;

            print!("{}", render_sheet(&sheet, rows));
        }

        Commands::Export {
            source,
            output,
            format,
            compression,
            chunk_size,
        } => {
            let config = load_config()?;
            let source = config.source(&source)?;
            let output =
                output.unwrap_or_else(|| generate_default_export_filename(&source.name, format.extension()));
            let loaded = load_source(&cache, source)?;

            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            println!(
                "Writing {} records to {}...",
                loaded.table.len(),
                output.display()
            );

            match format {
                ExportFormat::Parquet => {
                    let writer = ParquetWriter::new().with_compression(&compression)?;
                    writer.write_table_batched(&loaded.table, &output, chunk_size)?;
                    println!("\n{}", writer.get_file_info(&output)?.summary());
                }
                ExportFormat::Csv => {
                    CsvWriter::new().write_table_to_path(&loaded.table, &output)?;
                }
            }

            println!("Export complete!");
        }

        Commands::Download { source, output_dir } => {
            let config = load_config()?;
            let source = config.source(&source)?;
            let artifact_config = source
                .artifact
                .as_ref()
                .with_context(|| format!("Source {} has no downloadable file", source.name))?;

            let artifact = DownloadArtifact::load(artifact_config)?;
            let target = artifact.write_to(&output_dir)?;
            println!(
                "Saved {} ({}, {} bytes)",
                target.display(),
                artifact.mime_type,
                artifact.len()
            );
        }

        Commands::Info { file } => show_parquet_info(&file)?,
    }

    Ok(())
}

fn load_source(cache: &SessionCache, source: &SourceConfig) -> Result<Arc<LoadedSource>> {
    let progress = ProgressReporter::new(0, &format!("Consolidating {}...", source.name), false);
    let loaded = cache
        .get_or_load(source, Some(&progress))
        .with_context(|| format!("Failed to load source {}", source.name))?;

    progress.finish_with_message(&format!(
        "Consolidated {} records from {}",
        loaded.table.len(),
        source.name
    ));

    Ok(loaded)
}

/// Text table of a raw sheet; `rows == 0` shows every row
fn render_sheet(sheet: &RawSheet, rows: usize) -> String {
    let limit = if rows == 0 { usize::MAX } else { rows };
    sheet.to_text_table(limit)
}

fn parse_date_argument(value: &str) -> Result<NaiveDate> {
    match parse_sample_date(value) {
        SampleDate::Date(date) => Ok(date),
        SampleDate::Missing => bail!("Invalid date '{}', expected MM_DD_YYYY", value),
    }
}

fn create_output(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    File::create(path).with_context(|| format!("Cannot create {}", path.display()))
}

fn print_source(source: &SourceConfig) {
    println!("{}", source.name);
    println!("  Samples: {}", source.samples.display());
    println!(
        "  Coordinates: {} (sheet '{}', header row {}, zone {}{})",
        source.coordinates.path.display(),
        source.coordinates.sheet,
        source.coordinates.header_row,
        source.coordinates.zone_number,
        source.coordinates.zone_letter
    );
    println!("  Excluded columns: {}", source.excluded_columns.join(", "));
    println!("  Unparseable values: {:?}", source.unparseable);
    if let Some(artifact) = &source.artifact {
        println!(
            "  Download: {} as {} ({})",
            artifact.path.display(),
            artifact.file_name,
            artifact.mime_type
        );
    }
}

fn show_parquet_info(file: &Path) -> Result<()> {
    println!("Analyzing Parquet file: {}", file.display());

    let writer = ParquetWriter::new();
    let file_info = writer
        .get_file_info(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;

    println!("\n{}", file_info.summary());
    println!("Columns: {}", file_info.columns.join(", "));
    Ok(())
}
