//! Export a stream of transaction inputs into three offset-indexed blob stores:
//! every input in `unified`, plus each input in exactly one of `small` or `large`.

pub use calldex_arrow::{CalldexArrowError, InputColumn, InputColumnProps, DEFAULT_INPUT_COLUMN};
pub use calldex_ingestor::{
    classifier::{classify, Partition, Routing, DEFAULT_SIZE_THRESHOLD},
    errors::{CalldexIngestorError, SourceError},
    exporter::{ExportProps, ExportSummary, InputExporter, Termination, DEFAULT_RECORD_BUDGET},
    sources::{
        BatchSender, BatchSource, ChannelSource, InputBatch, ParquetFileSource,
        ParquetFileSourceProps, DEFAULT_ROWS_PER_BATCH,
    },
    state::{RunState, StoreCounters},
    store::{FileRole, OutputLayout, StoreKind, StoreOp, StorePaths},
    Result,
};

pub mod exports {
    pub use arrow_array;
    pub use arrow_schema;
    pub use parquet;
}
