use calldex::{
    CalldexArrowError, ExportProps, InputColumnProps, InputExporter, ParquetFileSource,
    ParquetFileSourceProps, SourceError, Termination,
};

use crate::test_util::{scratch_layout, write_parquet_inputs, ExportedStores};

const INPUTS: [Option<&[u8]>; 5] = [
    Some(b"ab"),
    None,
    Some(b"0123456789AB"),
    Some(b"xy"),
    Some(b"z"),
];

#[tokio::test(flavor = "multi_thread")]
async fn it_exports_a_parquet_file_of_inputs() -> anyhow::Result<()> {
    let (dir, layout) = scratch_layout()?;
    let filename = dir.path().join("transactions.parquet");
    write_parquet_inputs(&filename, &INPUTS)?;

    let source =
        ParquetFileSource::open(ParquetFileSourceProps::new(&filename).with_rows_per_batch(2))?;
    let summary = InputExporter::new(
        source,
        layout.clone(),
        ExportProps::default().with_size_threshold(10),
    )
    .run()
    .await?;

    assert_eq!(Termination::SourceExhausted, summary.termination);
    assert_eq!(3, summary.state.batches);
    assert_eq!(Some(5), summary.state.last_progress);
    assert_eq!(5, summary.state.records_seen);

    let stores = ExportedStores::read(&layout)?;
    assert_eq!(vec![2, 14, 16, 17], stores.unified.index);
    assert_eq!(vec![2, 4, 5], stores.small.index);
    assert_eq!(vec![12], stores.large.index);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn from_position_skips_leading_rows() -> anyhow::Result<()> {
    let (dir, layout) = scratch_layout()?;
    let filename = dir.path().join("transactions.parquet");
    write_parquet_inputs(&filename, &INPUTS)?;

    let source = ParquetFileSource::open(
        ParquetFileSourceProps::new(&filename).with_from_position(3),
    )?;
    let summary = InputExporter::new(source, layout.clone(), ExportProps::default())
        .run()
        .await?;

    assert_eq!(2, summary.state.records_seen);
    assert_eq!(Some(5), summary.state.last_progress);

    let stores = ExportedStores::read(&layout)?;
    assert_eq!(vec![&b"xy"[..], &b"z"[..]], stores.unified.records());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn budget_counts_rows_across_parquet_batches() -> anyhow::Result<()> {
    let (dir, layout) = scratch_layout()?;
    let filename = dir.path().join("transactions.parquet");
    write_parquet_inputs(&filename, &INPUTS)?;

    let source =
        ParquetFileSource::open(ParquetFileSourceProps::new(&filename).with_rows_per_batch(2))?;
    let summary = InputExporter::new(
        source,
        layout.clone(),
        ExportProps::default()
            .with_size_threshold(10)
            .with_record_budget(Some(3)),
    )
    .run()
    .await?;

    assert_eq!(Termination::BudgetReached, summary.termination);
    assert_eq!(4, summary.state.records_seen);
    assert_eq!(Some(4), summary.state.last_progress);

    let stores = ExportedStores::read(&layout)?;
    assert_eq!(vec![2, 14, 16], stores.unified.index);
    Ok(())
}

#[test]
fn opening_without_the_input_column_fails() -> anyhow::Result<()> {
    let (dir, _layout) = scratch_layout()?;
    let filename = dir.path().join("transactions.parquet");
    write_parquet_inputs(&filename, &INPUTS)?;

    let props =
        ParquetFileSourceProps::new(&filename).with_column(InputColumnProps::new("calldata"));

    match ParquetFileSource::open(props) {
        Err(SourceError::InputColumn(CalldexArrowError::ColumnNotFound(name))) => {
            assert_eq!("calldata", name)
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("expected the missing column to be reported"),
    }
    Ok(())
}
