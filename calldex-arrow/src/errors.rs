use arrow_schema::DataType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalldexArrowError {
    #[error("input column {0} not found in record batch")]
    ColumnNotFound(String),

    #[error("input column {column} is {data_type}, expected Binary or LargeBinary")]
    UnsupportedColumnType { column: String, data_type: DataType },
}

pub type Result<T> = core::result::Result<T, CalldexArrowError>;
