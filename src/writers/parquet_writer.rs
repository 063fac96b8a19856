//! Parquet output for the two relational tables: one storms file with the
//! WKT path column and one track-points file keyed by event_id.

use crate::error::Result;
use crate::models::{Observation, Storm};
use crate::utils::constants::DEFAULT_ROW_GROUP_SIZE;
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
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
            "snappy" => Compression::SNAPPY,
            "gzip" => Compression::GZIP(GzipLevel::default()),
            "lz4" => Compression::LZ4,
            "zstd" => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            "none" => Compression::UNCOMPRESSED,
            _ => {
                return Err(crate::error::ProcessingError::Config(format!(
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

    /// Write the storms table to a Parquet file
    pub fn write_storms(&self, storms: &[Storm], path: &Path) -> Result<()> {
        if storms.is_empty() {
            return Ok(());
        }

        let schema = self.storms_schema();
        let batch = self.storms_to_batch(storms, schema.clone())?;

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

    /// Write the track-points table to a Parquet file
    pub fn write_observations(&self, observations: &[Observation], path: &Path) -> Result<()> {
        if observations.is_empty() {
            return Ok(());
        }

        let schema = self.observations_schema();
        let batch = self.observations_to_batch(observations, schema.clone())?;

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

    /// Write the track-points table in batches for memory efficiency
    pub fn write_observations_batched(
        &self,
        observations: &[Observation],
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        if observations.is_empty() {
            return Ok(());
        }

        let schema = self.observations_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in observations.chunks(batch_size) {
            let batch = self.observations_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        Ok(())
    }

    fn storms_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("storm_id", DataType::Utf8, false),
            Field::new("basin", DataType::Utf8, false),
            Field::new("cyclone_number", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("num_observations", DataType::UInt32, false),
            Field::new(
                "start_time",
                DataType::Timestamp(TimeUnit::Second, None),
                true,
            ),
            // WKT, longitude-first, for a spatial load step
            Field::new("path_wkt", DataType::Utf8, true),
        ];

        Arc::new(Schema::new(fields))
    }

    fn storms_to_batch(&self, storms: &[Storm], schema: Arc<Schema>) -> Result<RecordBatch> {
        let storm_ids: Vec<String> = storms.iter().map(|s| s.storm_id.clone()).collect();
        let basins: Vec<String> = storms.iter().map(|s| s.basin.clone()).collect();
        let cyclone_numbers: Vec<String> = storms.iter().map(|s| s.cyclone_number.clone()).collect();
        let years: Vec<i32> = storms.iter().map(|s| s.year as i32).collect();
        let names: Vec<String> = storms.iter().map(|s| s.name.clone()).collect();
        let counts: Vec<u32> = storms.iter().map(|s| s.num_observations).collect();
        let start_times: Vec<Option<i64>> = storms
            .iter()
            .map(|s| s.start_time.map(|t| t.and_utc().timestamp()))
            .collect();
        let paths: Vec<Option<String>> = storms
            .iter()
            .map(|s| s.path_geo.as_ref().map(|g| g.to_wkt()))
            .collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(storm_ids)),
                Arc::new(StringArray::from(basins)),
                Arc::new(StringArray::from(cyclone_numbers)),
                Arc::new(Int32Array::from(years)),
                Arc::new(StringArray::from(names)),
                Arc::new(UInt32Array::from(counts)),
                Arc::new(TimestampSecondArray::from(start_times)),
                Arc::new(StringArray::from(paths)),
            ],
        )?;

        Ok(batch)
    }

    fn observations_schema(&self) -> Arc<Schema> {
        let mut fields = vec![
            Field::new("event_id", DataType::UInt64, false),
            Field::new("storm_id", DataType::Utf8, false),
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Second, None),
                false,
            ),
            Field::new("record_identifier", DataType::Utf8, true),
            Field::new("status", DataType::Utf8, true),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("max_wind", DataType::Int32, true),
            Field::new("min_pressure", DataType::Int32, true),
        ];
        for threshold in ["34kt", "50kt", "64kt"] {
            for quadrant in ["ne", "se", "sw", "nw"] {
                fields.push(Field::new(
                    format!("{}_{}_radii_max_nm", quadrant, threshold),
                    DataType::Int32,
                    true,
                ));
            }
        }

        Arc::new(Schema::new(fields))
    }

    fn observations_to_batch(
        &self,
        observations: &[Observation],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let event_ids: Vec<u64> = observations.iter().map(|o| o.event_id).collect();
        let storm_ids: Vec<String> = observations.iter().map(|o| o.storm_id.clone()).collect();
        let timestamps: Vec<i64> = observations
            .iter()
            .map(|o| o.timestamp.and_utc().timestamp())
            .collect();
        let record_identifiers: Vec<Option<&str>> = observations
            .iter()
            .map(|o| o.record_identifier.map(|r| r.as_code()))
            .collect();
        let statuses: Vec<Option<&str>> = observations
            .iter()
            .map(|o| o.status.map(|s| s.as_code()))
            .collect();
        let latitudes: Vec<f64> = observations.iter().map(|o| o.latitude).collect();
        let longitudes: Vec<f64> = observations.iter().map(|o| o.longitude).collect();
        let max_winds: Vec<Option<i32>> = observations.iter().map(|o| o.max_wind).collect();
        let min_pressures: Vec<Option<i32>> =
            observations.iter().map(|o| o.min_pressure).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(UInt64Array::from(event_ids)),
            Arc::new(StringArray::from(storm_ids)),
            Arc::new(TimestampSecondArray::from(timestamps)),
            Arc::new(StringArray::from(record_identifiers)),
            Arc::new(StringArray::from(statuses)),
            Arc::new(Float64Array::from(latitudes)),
            Arc::new(Float64Array::from(longitudes)),
            Arc::new(Int32Array::from(max_winds)),
            Arc::new(Int32Array::from(min_pressures)),
        ];
        let radii_of = [
            |o: &Observation| o.radii_34kt,
            |o: &Observation| o.radii_50kt,
            |o: &Observation| o.radii_64kt,
        ];
        for radii in radii_of {
            let ne: Vec<Option<i32>> = observations.iter().map(|o| radii(o).ne).collect();
            let se: Vec<Option<i32>> = observations.iter().map(|o| radii(o).se).collect();
            let sw: Vec<Option<i32>> = observations.iter().map(|o| radii(o).sw).collect();
            let nw: Vec<Option<i32>> = observations.iter().map(|o| radii(o).nw).collect();
            columns.push(Arc::new(Int32Array::from(ne)));
            columns.push(Arc::new(Int32Array::from(se)));
            columns.push(Arc::new(Int32Array::from(sw)));
            columns.push(Arc::new(Int32Array::from(nw)));
        }

        let batch = RecordBatch::try_new(schema, columns)?;
        Ok(batch)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            file_size,
            compression: self.compression,
        })
    }

    /// Read sample storm rows from a storms Parquet file
    pub fn read_sample_storms(&self, path: &Path, limit: usize) -> Result<Vec<StormSummary>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.min(8192))
            .build()?;

        let mut storms = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let storm_ids = downcast::<StringArray>(&batch, 0, "storm_id")?;
            let years = downcast::<Int32Array>(&batch, 3, "year")?;
            let names = downcast::<StringArray>(&batch, 4, "name")?;
            let counts = downcast::<UInt32Array>(&batch, 5, "num_observations")?;
            let paths = downcast::<StringArray>(&batch, 7, "path_wkt")?;

            for i in 0..batch.num_rows() {
                storms.push(StormSummary {
                    storm_id: storm_ids.value(i).to_string(),
                    name: names.value(i).to_string(),
                    year: years.value(i),
                    num_observations: counts.value(i),
                    has_path: !paths.is_null(i),
                });

                if storms.len() >= limit {
                    return Ok(storms);
                }
            }
        }

        Ok(storms)
    }
}

fn downcast<'a, T: 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| {
            crate::error::ProcessingError::Config(format!("Invalid {} column type", name))
        })
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression
        )
    }
}

/// Condensed storm row for the `info` command's sample display.
#[derive(Debug, Clone)]
pub struct StormSummary {
    pub storm_id: String,
    pub name: String,
    pub year: i32,
    pub num_observations: u32,
    pub has_path: bool,
}
