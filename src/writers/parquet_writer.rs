use crate::error::{ProcessingError, Result};
use crate::models::{ConsolidatedRecord, ConsolidatedTable};
use crate::writers::{column_names, FIXED_COLUMNS};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write a consolidated table to a Parquet file
    pub fn write_table(&self, table: &ConsolidatedTable, path: &Path) -> Result<()> {
        self.write_table_batched(table, path, table.len().max(1))
    }

    /// Write a table in record batches of `batch_size` rows
    pub fn write_table_batched(
        &self,
        table: &ConsolidatedTable,
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        if batch_size == 0 {
            return Err(ProcessingError::Config("batch size must be positive".to_string()));
        }

        let schema = self.create_schema(table.variables());
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in table.records().chunks(batch_size) {
            let batch = self.records_to_batch(chunk, table.variables().len(), schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        debug!(
            "Wrote {} records of {} to {}",
            table.len(),
            table.source(),
            path.display()
        );
        Ok(())
    }

    /// Seven fixed columns, then one nullable Float64 column per variable
    fn create_schema(&self, variables: &[String]) -> Arc<Schema> {
        let fields: Vec<Field> = column_names(variables)
            .into_iter()
            .enumerate()
            .map(|(i, name)| match i {
                0 | 2 => Field::new(name, DataType::Utf8, false),
                1 => Field::new(name, DataType::Date32, true),
                _ => Field::new(name, DataType::Float64, true),
            })
            .collect();

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(
        &self,
        records: &[ConsolidatedRecord],
        variable_count: usize,
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let dates: Vec<Option<i32>> = records
            .iter()
            .map(|r| r.date.date().map(days_since_epoch))
            .collect();
        let labels: Vec<&str> = records.iter().map(|r| r.date_label.as_str()).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(Date32Array::from(dates)),
            Arc::new(StringArray::from(labels)),
            float_column(records, |r| r.easting),
            float_column(records, |r| r.northing),
            float_column(records, |r| r.latitude),
            float_column(records, |r| r.longitude),
        ];
        for column in 0..variable_count {
            columns.push(float_column(records, |r| r.value(column)));
        }

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        if !path.exists() {
            return Err(ProcessingError::MissingSourceFile(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let columns: Vec<String> = file_metadata
            .schema_descr()
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            row_group_sizes.push(metadata.row_group(i).num_rows());
        }

        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            Compression::UNCOMPRESSED
        };

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
            variables: columns.iter().skip(FIXED_COLUMNS.len()).cloned().collect(),
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as i32
}

fn float_column<F>(records: &[ConsolidatedRecord], field: F) -> ArrayRef
where
    F: Fn(&ConsolidatedRecord) -> Option<f64>,
{
    Arc::new(Float64Array::from(
        records.iter().map(field).collect::<Vec<Option<f64>>>(),
    ))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
    pub columns: Vec<String>,
    pub variables: Vec<String>,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}\n\
            - Variables: {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            avg_rows,
            self.variables.join(", ")
        )
    }
}
