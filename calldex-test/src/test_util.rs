use std::{fs::File, iter, path::Path, sync::Arc};

use anyhow::Result;
use itertools::Itertools;
use tempfile::{tempdir, TempDir};

use calldex::{
    exports::{
        arrow_array::{BinaryArray, RecordBatch, UInt64Array},
        arrow_schema::{DataType, Field, Schema},
        parquet::arrow::ArrowWriter,
    },
    ChannelSource, InputBatch, OutputLayout, SourceError, StoreKind,
};

/// Scratch directory with the default output layout inside it.
/// Keep the `TempDir` alive for as long as the files are needed.
pub fn scratch_layout() -> Result<(TempDir, OutputLayout)> {
    let dir = tempdir()?;
    let layout = OutputLayout::in_dir(dir.path());
    Ok((dir, layout))
}

/// A source that yields each item in order, then ends
pub fn scripted_source<I>(items: I) -> ChannelSource
where
    I: IntoIterator<Item = core::result::Result<InputBatch, SourceError>>,
{
    let (tx, source) = ChannelSource::new();
    for item in items {
        tx.send(item).expect("source receiver is alive");
    }
    source
}

pub fn batches_source(batches: Vec<InputBatch>) -> ChannelSource {
    scripted_source(batches.into_iter().map(Ok))
}

/// `[Absent, "ab", "0123456789AB"]` then `[Absent, "xy", "z"]`
pub fn two_batch_fixture() -> Vec<InputBatch> {
    vec![
        InputBatch::from_records(
            100,
            vec![None, Some(&b"ab"[..]), Some(&b"0123456789AB"[..])],
        ),
        InputBatch::from_records(101, vec![None, Some(&b"xy"[..]), Some(&b"z"[..])]),
    ]
}

/// Blob and parsed index of one store, read back from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContents {
    pub blob: Vec<u8>,
    pub index: Vec<u64>,
}

impl StoreContents {
    pub fn read(layout: &OutputLayout, store: StoreKind) -> Result<Self> {
        let paths = layout.paths(store);
        let blob = std::fs::read(&paths.blob)?;
        let index = std::fs::read_to_string(&paths.index)?
            .split_ascii_whitespace()
            .map(str::parse::<u64>)
            .collect::<core::result::Result<Vec<_>, _>>()?;

        Ok(Self { blob, index })
    }

    /// Record `k`, counting from 1, found by scanning the index
    pub fn record(&self, k: usize) -> Option<&[u8]> {
        let end = *self.index.get(k.checked_sub(1)?)?;
        let start = match k {
            1 => 0,
            _ => self.index[k - 2],
        };
        self.blob.get(start as usize..end as usize)
    }

    pub fn records(&self) -> Vec<&[u8]> {
        self.bounds()
            .map(|(start, end)| &self.blob[start as usize..end as usize])
            .collect()
    }

    /// Lengths implied by consecutive index entries
    pub fn lengths(&self) -> Vec<u64> {
        self.bounds().map(|(start, end)| end - start).collect()
    }

    /// Blob bytes past the last index entry
    pub fn unindexed_bytes(&self) -> u64 {
        self.blob.len() as u64 - self.index.last().copied().unwrap_or(0)
    }

    fn bounds(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        iter::once(0)
            .chain(self.index.iter().copied())
            .tuple_windows()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedStores {
    pub unified: StoreContents,
    pub small: StoreContents,
    pub large: StoreContents,
}

impl ExportedStores {
    pub fn read(layout: &OutputLayout) -> Result<Self> {
        Ok(Self {
            unified: StoreContents::read(layout, StoreKind::Unified)?,
            small: StoreContents::read(layout, StoreKind::Small)?,
            large: StoreContents::read(layout, StoreKind::Large)?,
        })
    }
}

/// Writes a transactions file with a `block_number` column and a nullable `input` column
pub fn write_parquet_inputs(path: &Path, inputs: &[Option<&[u8]>]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("block_number", DataType::UInt64, false),
        Field::new("input", DataType::Binary, true),
    ]));

    let blocks = UInt64Array::from_iter_values(0..inputs.len() as u64);
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(blocks),
            Arc::new(BinaryArray::from_iter(inputs.iter().copied())),
        ],
    )?;

    let mut writer = ArrowWriter::try_new(File::create(path)?, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}
