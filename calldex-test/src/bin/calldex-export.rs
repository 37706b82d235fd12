use std::path::PathBuf;

use clap::Parser;
use tokio::sync::watch;

use calldex::{
    ExportProps, InputColumnProps, InputExporter, OutputLayout, ParquetFileSource,
    ParquetFileSourceProps, StoreKind, StorePaths, DEFAULT_INPUT_COLUMN, DEFAULT_ROWS_PER_BATCH,
    DEFAULT_SIZE_THRESHOLD,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.dest)?;

    tracing::info!(
        "starting export of {:#?} into {:#?}",
        cli.source,
        cli.dest
    );

    let source = ParquetFileSource::open(
        ParquetFileSourceProps::new(&cli.source)
            .with_column(InputColumnProps::new(cli.column.clone()))
            .with_from_position(cli.from_position)
            .with_rows_per_batch(cli.rows_per_batch),
    )?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping after the current batch");
            let _ = cancel_tx.send(true);
        }
    });

    let exporter = InputExporter::new(source, cli.layout(), cli.export_props())
        .with_cancellation(cancel_rx);

    let summary = match exporter.run().await {
        Ok(summary) => summary,
        Err(err) => {
            tracing::error!("export failed: {err}");
            return Err(err.into());
        }
    };

    tracing::info!(
        "exported {} of {} records ({:?}) in {}ms",
        summary.state.unified.records,
        summary.state.records_seen,
        summary.termination,
        (summary.finished_at - summary.started_at).num_milliseconds()
    );

    Ok(())
}

/// Export transaction inputs from a Parquet file into unified, small and large blob stores
#[derive(Parser, Debug)]
struct Cli {
    /// Parquet file of transactions
    #[arg(short, long, env = "CALLDEX_SOURCE")]
    source: PathBuf,

    /// Column holding the raw transaction inputs
    #[arg(short, long, env = "CALLDEX_COLUMN", default_value = DEFAULT_INPUT_COLUMN)]
    column: String,

    /// Row of the source to start from
    #[arg(long, env = "CALLDEX_FROM_POSITION", default_value_t = 0)]
    from_position: u64,

    /// Stop after the batch that brings the records seen to this many.
    /// Unset drains the whole file, unlike the library default of one million records
    #[arg(long, env = "CALLDEX_RECORD_BUDGET")]
    record_budget: Option<u64>,

    /// Inputs of at least this many bytes go to the large store
    #[arg(long, env = "CALLDEX_SIZE_THRESHOLD", default_value_t = DEFAULT_SIZE_THRESHOLD)]
    size_threshold: usize,

    #[arg(long, env = "CALLDEX_ROWS_PER_BATCH", default_value_t = DEFAULT_ROWS_PER_BATCH)]
    rows_per_batch: usize,

    /// Directory for the output files, created if missing
    #[arg(short, long, env = "CALLDEX_DEST", default_value = ".")]
    dest: PathBuf,

    #[arg(long, env = "CALLDEX_UNIFIED_BLOB")]
    unified_blob: Option<PathBuf>,
    #[arg(long, env = "CALLDEX_UNIFIED_INDEX")]
    unified_index: Option<PathBuf>,
    #[arg(long, env = "CALLDEX_SMALL_BLOB")]
    small_blob: Option<PathBuf>,
    #[arg(long, env = "CALLDEX_SMALL_INDEX")]
    small_index: Option<PathBuf>,
    #[arg(long, env = "CALLDEX_LARGE_BLOB")]
    large_blob: Option<PathBuf>,
    #[arg(long, env = "CALLDEX_LARGE_INDEX")]
    large_index: Option<PathBuf>,
}

impl Cli {
    fn export_props(&self) -> ExportProps {
        ExportProps::default()
            .with_size_threshold(self.size_threshold)
            .with_record_budget(self.record_budget)
    }

    fn layout(&self) -> OutputLayout {
        let defaults = OutputLayout::in_dir(&self.dest);
        let overrides = [
            (StoreKind::Unified, &self.unified_blob, &self.unified_index),
            (StoreKind::Small, &self.small_blob, &self.small_index),
            (StoreKind::Large, &self.large_blob, &self.large_index),
        ];

        overrides
            .into_iter()
            .fold(defaults.clone(), |layout, (store, blob, index)| {
                let default = defaults.paths(store);
                let paths = StorePaths::new(
                    blob.clone().unwrap_or_else(|| default.blob.clone()),
                    index.clone().unwrap_or_else(|| default.index.clone()),
                );
                layout.with_paths(store, paths)
            })
    }
}
