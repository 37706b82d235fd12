use arrow_schema::ArrowError;
use calldex_arrow::CalldexArrowError;
use thiserror::Error;

use crate::store::{FileRole, StoreKind, StoreOp};

#[derive(Error, Debug)]
pub enum CalldexIngestorError {
    #[error("Source Fault: {0}")]
    SourceFault(#[from] SourceError),

    #[error("Io Error during {op} of {store} {file}: {source}")]
    StoreIo {
        store: StoreKind,
        file: FileRole,
        op: StoreOp,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} store files failed to close, first: {first}")]
    CloseFailed {
        failed: usize,
        #[source]
        first: Box<CalldexIngestorError>,
    },
}

/// Failures reported by whatever is feeding batches into the exporter
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Upstream Error: {0}")]
    Upstream(String),

    #[error("Input Column Error: {0}")]
    InputColumn(#[from] CalldexArrowError),

    #[error("Parquet Error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("Arrow Error: {0}")]
    ArrowError(#[from] ArrowError),

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),
}
