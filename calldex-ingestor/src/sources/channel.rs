use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use super::{BatchSource, InputBatch};
use crate::errors::SourceError;

type ChanItem = Result<InputBatch, SourceError>;

pub type BatchSender = UnboundedSender<ChanItem>;

/// Source fed by an upstream client over a channel.
/// Dropping every sender ends the stream; sending an `Err` faults it.
pub struct ChannelSource {
    rx: UnboundedReceiver<ChanItem>,
}

impl ChannelSource {
    pub fn new() -> (BatchSender, Self) {
        let (tx, rx) = unbounded_channel();
        (tx, Self { rx })
    }

    pub fn from_receiver(rx: UnboundedReceiver<ChanItem>) -> Self {
        Self { rx }
    }
}

impl BatchSource for ChannelSource {
    async fn next_batch(&mut self) -> Result<Option<InputBatch>, SourceError> {
        self.rx.recv().await.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_yields_batches_then_ends_when_senders_drop() -> anyhow::Result<()> {
        let (tx, mut source) = ChannelSource::new();

        tx.send(Ok(InputBatch::from_records(3, vec![None, Some(b"ab")])))?;
        drop(tx);

        let batch = source.next_batch().await?.expect("a batch");
        assert_eq!(3, batch.progress);
        assert_eq!(2, batch.len());

        assert!(source.next_batch().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn upstream_errors_surface_as_faults() -> anyhow::Result<()> {
        let (tx, mut source) = ChannelSource::new();
        tx.send(Err(SourceError::Upstream("connection reset".into())))?;

        match source.next_batch().await {
            Err(SourceError::Upstream(msg)) => assert_eq!("connection reset", msg),
            other => panic!("expected upstream fault, got {other:?}"),
        }
        Ok(())
    }
}
