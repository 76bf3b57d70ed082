use crate::error::{ProcessingError, Result};
use crate::models::VhiRecord;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

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

    /// Write a normalized table. Every row must carry an integer year.
    pub fn write_records(&self, records: &[VhiRecord], path: &Path) -> Result<()> {
        let schema = self.create_schema();
        let batch = self.records_to_batch(records, schema.clone())?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("year", DataType::Int32, false),
            Field::new("week", DataType::UInt32, false),
            Field::new("smn", DataType::Float64, false),
            Field::new("smt", DataType::Float64, false),
            Field::new("vci", DataType::Float64, false),
            Field::new("tci", DataType::Float64, false),
            Field::new("vhi", DataType::Float64, false),
            Field::new("area", DataType::Utf8, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(&self, records: &[VhiRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let years = records
            .iter()
            .map(|r| {
                r.year_value().ok_or_else(|| {
                    ProcessingError::InvalidFormat(format!(
                        "Year '{}' is not normalized",
                        r.year
                    ))
                })
            })
            .collect::<Result<Vec<i32>>>()?;

        let column = |f: fn(&VhiRecord) -> f64| -> ArrayRef {
            Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
        };

        let weeks: Vec<u32> = records.iter().map(|r| r.week).collect();
        let areas: Vec<String> = records.iter().map(|r| r.area.to_string()).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from(years)),
            Arc::new(UInt32Array::from(weeks)),
            column(|r| r.smn),
            column(|r| r.smt),
            column(|r| r.vci),
            column(|r| r.tci),
            column(|r| r.vhi),
            Arc::new(StringArray::from(areas)),
        ];

        let batch = RecordBatch::try_new(schema, columns)?;

        Ok(batch)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: metadata.num_row_groups(),
            file_size,
            compression: format!("{:?}", self.compression),
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub file_size: u64,
    pub compression: String,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Rows: {}\nRow groups: {}\nFile size: {:.2} MB\nCompression: {}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / (1024.0 * 1024.0),
            self.compression
        )
    }
}
