//! Pull transaction input payloads out of Arrow record batches.

mod errors;
mod input_column;

use arrow_array::RecordBatch;

pub use errors::{CalldexArrowError, Result};
pub use input_column::InputColumn;

pub mod exports {
    pub use arrow_array::{
        Array, ArrayRef, BinaryArray, LargeBinaryArray, RecordBatch, RecordBatchReader,
    };
    pub use arrow_schema;
}

pub const DEFAULT_INPUT_COLUMN: &str = "input";

/// Names the column of an upstream record batch that carries the raw inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumnProps {
    pub column_name: String,
}

impl InputColumnProps {
    pub fn new<S: Into<String>>(column_name: S) -> Self {
        Self {
            column_name: column_name.into(),
        }
    }

    pub fn extract(&self, batch: &RecordBatch) -> Result<InputColumn> {
        InputColumn::from_batch(batch, &self.column_name)
    }
}

impl Default for InputColumnProps {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_COLUMN)
    }
}
