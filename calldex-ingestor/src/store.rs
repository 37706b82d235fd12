mod index_accumulator;
mod layout;
mod segmented_writer;
mod store_file;

use std::fmt;

use tracing::{debug, error};

pub use index_accumulator::IndexAccumulator;
pub use layout::{OutputLayout, StorePaths};
pub use segmented_writer::SegmentedWriter;

use crate::{classifier::Partition, errors::CalldexIngestorError, state::RunState, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Unified,
    Small,
    Large,
}

impl StoreKind {
    pub const ALL: [StoreKind; 3] = [StoreKind::Unified, StoreKind::Small, StoreKind::Large];

    pub fn name(self) -> &'static str {
        match self {
            StoreKind::Unified => "unified",
            StoreKind::Small => "small",
            StoreKind::Large => "large",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Blob,
    Index,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRole::Blob => f.write_str("blob"),
            FileRole::Index => f.write_str("index"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Open,
    Append,
    Close,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOp::Open => f.write_str("open"),
            StoreOp::Append => f.write_str("append"),
            StoreOp::Close => f.write_str("close"),
        }
    }
}

/// All six files of an export: a blob writer and an index accumulator per store.
/// Consumed by `close`, so every handle is released exactly once.
pub struct StoreSet {
    writer: SegmentedWriter,
    index: IndexAccumulator,
}

impl StoreSet {
    /// Creates (truncating) every blob and index file named by the layout
    pub fn create(layout: &OutputLayout) -> Result<Self> {
        let writer = SegmentedWriter::create(layout)?;
        let index = IndexAccumulator::create(layout)?;
        debug!(?layout, "opened store files");

        Ok(Self { writer, index })
    }

    /// Writes an accepted record: blob then index, unified store first
    pub fn accept(
        &mut self,
        state: &mut RunState,
        partition: Partition,
        bytes: &[u8],
    ) -> Result<()> {
        for store in partition.stores() {
            let offset = self.writer.append(state, store, bytes)?;
            self.index.record(store, offset)?;
        }
        Ok(())
    }

    /// Syncs and closes all six files. A failed close is logged and does not stop
    /// the remaining files from closing; the first failure is returned.
    pub fn close(self) -> Result<()> {
        let mut failures = Vec::new();

        for file in self
            .writer
            .into_files()
            .into_iter()
            .chain(self.index.into_files())
        {
            let path = file.path().to_owned();
            if let Err(err) = file.close() {
                error!(path = %path.display(), %err, "failed to close store file");
                failures.push(err);
            }
        }

        let failed = failures.len();
        match failures.into_iter().next() {
            None => Ok(()),
            Some(first) if failed == 1 => Err(first),
            Some(first) => Err(CalldexIngestorError::CloseFailed {
                failed,
                first: Box::new(first),
            }),
        }
    }
}
