use arrow_array::{cast::AsArray, Array, ArrayRef, BinaryArray, LargeBinaryArray, RecordBatch};
use arrow_schema::DataType;
use itertools::Either;

use crate::{CalldexArrowError, Result};

/// A column of optional transaction inputs, one slot per upstream record.
/// Null slots are records that arrived absent or invalid.
#[derive(Debug, Clone)]
pub enum InputColumn {
    Binary(BinaryArray),
    LargeBinary(LargeBinaryArray),
}

impl InputColumn {
    pub fn from_batch(batch: &RecordBatch, column_name: &str) -> Result<Self> {
        let array = batch
            .column_by_name(column_name)
            .ok_or_else(|| CalldexArrowError::ColumnNotFound(column_name.to_owned()))?;

        Self::try_from_array(column_name, array)
    }

    pub fn try_from_array(column_name: &str, array: &ArrayRef) -> Result<Self> {
        match array.data_type() {
            DataType::Binary => Ok(Self::Binary(array.as_binary::<i32>().clone())),
            DataType::LargeBinary => Ok(Self::LargeBinary(array.as_binary::<i64>().clone())),
            other => Err(CalldexArrowError::UnsupportedColumnType {
                column: column_name.to_owned(),
                data_type: other.clone(),
            }),
        }
    }

    /// Build a column straight from optional byte buffers, `None` marking an absent record
    pub fn from_records<I, P>(records: I) -> Self
    where
        I: IntoIterator<Item = Option<P>>,
        P: AsRef<[u8]>,
    {
        Self::Binary(records.into_iter().collect())
    }

    /// Records in arrival order
    pub fn iter(&self) -> impl Iterator<Item = Option<&[u8]>> + '_ {
        match self {
            Self::Binary(array) => Either::Left(array.iter()),
            Self::LargeBinary(array) => Either::Right(array.iter()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Binary(array) => array.len(),
            Self::LargeBinary(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            Self::Binary(array) => array.null_count(),
            Self::LargeBinary(array) => array.null_count(),
        }
    }
}
