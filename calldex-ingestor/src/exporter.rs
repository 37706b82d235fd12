use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    classifier::{classify, Routing, DEFAULT_SIZE_THRESHOLD},
    sources::{BatchSource, InputBatch},
    state::RunState,
    store::{OutputLayout, StoreSet},
    Result,
};

pub const DEFAULT_RECORD_BUDGET: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProps {
    pub size_threshold: usize,
    /// Stop pulling once this many records (valid or not) have been seen, `None` drains the source
    pub record_budget: Option<u64>,
}

impl ExportProps {
    pub fn with_size_threshold(mut self, size_threshold: usize) -> Self {
        self.size_threshold = size_threshold;
        self
    }

    pub fn with_record_budget(mut self, record_budget: Option<u64>) -> Self {
        self.record_budget = record_budget;
        self
    }
}

impl Default for ExportProps {
    fn default() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            record_budget: Some(DEFAULT_RECORD_BUDGET),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    SourceExhausted,
    BudgetReached,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub state: RunState,
    pub termination: Termination,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Drains a batch source into the unified, small and large stores.
/// Batches are pulled one at a time and fully written before the next pull.
pub struct InputExporter<S: BatchSource> {
    source: S,
    layout: OutputLayout,
    props: ExportProps,
    cancel: Option<watch::Receiver<bool>>,
}

impl<S: BatchSource> InputExporter<S> {
    pub fn new(source: S, layout: OutputLayout, props: ExportProps) -> Self {
        Self {
            source,
            layout,
            props,
            cancel: None,
        }
    }

    /// Stop before the next pull once `true` is sent on the paired sender
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub async fn run(mut self) -> Result<ExportSummary> {
        let started_at = Utc::now();
        let mut stores = StoreSet::create(&self.layout)?;
        let mut state = RunState::default();

        let outcome = self.ingest(&mut stores, &mut state).await;
        let closed = stores.close();

        let termination = match (outcome, closed) {
            (Ok(termination), Ok(())) => termination,
            (Ok(_), Err(err)) => return Err(err),
            (Err(err), closed) => {
                if let Err(close_err) = closed {
                    warn!(%close_err, "store files did not close cleanly after a failed export");
                }
                return Err(err);
            }
        };

        let summary = ExportSummary {
            state,
            termination,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            termination = ?summary.termination,
            records_seen = summary.state.records_seen,
            unified = summary.state.unified.records,
            small = summary.state.small.records,
            large = summary.state.large.records,
            "export finished"
        );

        Ok(summary)
    }

    async fn ingest(
        &mut self,
        stores: &mut StoreSet,
        state: &mut RunState,
    ) -> Result<Termination> {
        loop {
            if self.cancelled() {
                return Ok(Termination::Cancelled);
            }

            let Some(batch) = self.source.next_batch().await? else {
                return Ok(Termination::SourceExhausted);
            };

            self.drain(&batch, stores, state)?;
            info!(
                records_seen = state.records_seen,
                "processed up to {}", batch.progress
            );

            if state.budget_reached(self.props.record_budget) {
                return Ok(Termination::BudgetReached);
            }
        }
    }

    fn drain(
        &self,
        batch: &InputBatch,
        stores: &mut StoreSet,
        state: &mut RunState,
    ) -> Result<()> {
        for record in batch.inputs.iter() {
            state.observe_record();
            if let (Some(bytes), Routing::RouteTo(partition)) =
                (record, classify(record, self.props.size_threshold))
            {
                stores.accept(state, partition, bytes)?;
            }
        }

        state.finish_batch(batch.progress);
        Ok(())
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|cancel| *cancel.borrow())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{
        errors::{CalldexIngestorError, SourceError},
        sources::ChannelSource,
        store::StoreKind,
    };

    fn read_index(path: &std::path::Path) -> anyhow::Result<Vec<u64>> {
        Ok(std::fs::read_to_string(path)?
            .split_ascii_whitespace()
            .map(str::parse::<u64>)
            .collect::<core::result::Result<Vec<_>, _>>()?)
    }

    #[tokio::test]
    async fn budget_is_checked_between_batches() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let (tx, source) = ChannelSource::new();
        tx.send(Ok(InputBatch::from_records(10, vec![Some(b"a"), Some(b"b")])))?;
        tx.send(Ok(InputBatch::from_records(20, vec![Some(b"c"), Some(b"d")])))?;
        tx.send(Ok(InputBatch::from_records(30, vec![Some(b"e")])))?;
        drop(tx);

        let summary = InputExporter::new(
            source,
            OutputLayout::in_dir(dir.path()),
            ExportProps::default().with_record_budget(Some(3)),
        )
        .run()
        .await?;

        assert_eq!(Termination::BudgetReached, summary.termination);
        assert_eq!(4, summary.state.records_seen);
        assert_eq!(2, summary.state.batches);
        assert_eq!(Some(20), summary.state.last_progress);
        assert_eq!(
            vec![1, 2, 3, 4],
            read_index(&OutputLayout::in_dir(dir.path()).unified.index)?
        );
        Ok(())
    }

    #[tokio::test]
    async fn cancelled_runs_still_create_every_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let layout = OutputLayout::in_dir(dir.path());
        let (tx, source) = ChannelSource::new();
        tx.send(Ok(InputBatch::from_records(1, vec![Some(b"never")])))?;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        cancel_tx.send(true)?;

        let summary = InputExporter::new(source, layout.clone(), ExportProps::default())
            .with_cancellation(cancel_rx)
            .run()
            .await?;

        assert_eq!(Termination::Cancelled, summary.termination);
        assert_eq!(0, summary.state.records_seen);
        for store in StoreKind::ALL {
            assert_eq!(0, std::fs::metadata(&layout.paths(store).blob)?.len());
            assert!(read_index(&layout.paths(store).index)?.is_empty());
        }
        Ok(())
    }

    #[tokio::test]
    async fn source_faults_keep_the_written_prefix() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let layout = OutputLayout::in_dir(dir.path());
        let (tx, source) = ChannelSource::new();
        tx.send(Ok(InputBatch::from_records(1, vec![Some(b"ab"), None])))?;
        tx.send(Err(SourceError::Upstream("stream reset".into())))?;

        let err = InputExporter::new(source, layout.clone(), ExportProps::default())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CalldexIngestorError::SourceFault(SourceError::Upstream(_))
        ));
        assert_eq!(b"ab", &std::fs::read(&layout.unified.blob)?[..]);
        assert_eq!(vec![2], read_index(&layout.unified.index)?);
        assert_eq!(vec![2], read_index(&layout.small.index)?);
        assert!(read_index(&layout.large.index)?.is_empty());
        Ok(())
    }
}
