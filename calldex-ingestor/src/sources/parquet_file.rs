//! Source reading transaction inputs back out of a local Parquet export

use std::{fs::File, path::Path};

use calldex_arrow::{CalldexArrowError, InputColumnProps};
use parquet::arrow::{
    arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder},
    ProjectionMask,
};
use tokio::task::block_in_place;
use tracing::debug;

use super::{BatchSource, InputBatch};
use crate::errors::SourceError;

pub const DEFAULT_ROWS_PER_BATCH: usize = 8192;

pub struct ParquetFileSourceProps<P: AsRef<Path>> {
    pub filename: P,
    pub column: InputColumnProps,
    /// Row to start streaming from
    pub from_position: u64,
    pub rows_per_batch: usize,
}

impl<P: AsRef<Path>> ParquetFileSourceProps<P> {
    pub fn new(filename: P) -> Self {
        Self {
            filename,
            column: InputColumnProps::default(),
            from_position: 0,
            rows_per_batch: DEFAULT_ROWS_PER_BATCH,
        }
    }

    pub fn with_column(mut self, column: InputColumnProps) -> Self {
        self.column = column;
        self
    }

    pub fn with_from_position(mut self, from_position: u64) -> Self {
        self.from_position = from_position;
        self
    }

    pub fn with_rows_per_batch(mut self, rows_per_batch: usize) -> Self {
        self.rows_per_batch = rows_per_batch;
        self
    }
}

/// Streams the input column of a Parquet file batch by batch.
/// Progress markers are the absolute row position after each batch.
/// Reads block the worker thread, so this needs the multi-threaded runtime.
pub struct ParquetFileSource {
    reader: ParquetRecordBatchReader,
    column: InputColumnProps,
    position: u64,
}

impl ParquetFileSource {
    pub fn open<P: AsRef<Path>>(props: ParquetFileSourceProps<P>) -> Result<Self, SourceError> {
        let file = File::open(props.filename.as_ref())?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        let column_name = &props.column.column_name;
        let leaf = builder
            .parquet_schema()
            .columns()
            .iter()
            .position(|column| column.name() == column_name.as_str())
            .ok_or_else(|| CalldexArrowError::ColumnNotFound(column_name.to_owned()))?;
        let projection = ProjectionMask::leaves(builder.parquet_schema(), [leaf]);

        let offset = usize::try_from(props.from_position).unwrap_or(usize::MAX);
        let reader = builder
            .with_projection(projection)
            .with_batch_size(props.rows_per_batch.max(1))
            .with_offset(offset)
            .build()?;

        debug!(
            filename = %props.filename.as_ref().display(),
            from_position = props.from_position,
            "opened parquet source"
        );

        Ok(Self {
            reader,
            column: props.column,
            position: props.from_position,
        })
    }
}

impl BatchSource for ParquetFileSource {
    async fn next_batch(&mut self) -> Result<Option<InputBatch>, SourceError> {
        let Some(batch) = block_in_place(|| self.reader.next()).transpose()? else {
            return Ok(None);
        };

        let inputs = self.column.extract(&batch)?;
        self.position += batch.num_rows() as u64;

        Ok(Some(InputBatch::new(inputs, self.position)))
    }
}
