pub mod classifier;
pub mod errors;
pub mod exporter;
pub mod sources;
pub mod state;
pub mod store;

pub type Result<T> = core::result::Result<T, errors::CalldexIngestorError>;
