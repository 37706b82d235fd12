//! Export binary, fixtures and end-to-end tests for calldex.

pub mod test_util;
