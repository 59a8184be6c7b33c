pub mod combat;
pub mod config;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
