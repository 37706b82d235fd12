use std::future::Future;

use calldex_arrow::InputColumn;

use crate::errors::SourceError;

pub mod channel;
pub mod parquet_file;

pub use channel::{BatchSender, ChannelSource};
pub use parquet_file::{ParquetFileSource, ParquetFileSourceProps, DEFAULT_ROWS_PER_BATCH};

/// One delivery from upstream: a column of optional inputs and how far upstream has progressed.
/// The progress marker is only ever logged.
#[derive(Debug, Clone)]
pub struct InputBatch {
    pub inputs: InputColumn,
    pub progress: u64,
}

impl InputBatch {
    pub fn new(inputs: InputColumn, progress: u64) -> Self {
        Self { inputs, progress }
    }

    pub fn from_records<I, P>(progress: u64, records: I) -> Self
    where
        I: IntoIterator<Item = Option<P>>,
        P: AsRef<[u8]>,
    {
        Self::new(InputColumn::from_records(records), progress)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Ordered stream of input batches feeding an export
pub trait BatchSource {
    /// Pulls the next batch, `Ok(None)` once upstream is exhausted
    fn next_batch(&mut self) -> impl Future<Output = Result<Option<InputBatch>, SourceError>>;
}
