pub mod completion;
pub mod config;
pub mod connection;
pub mod error;
pub mod gateway;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

// Re-export common error type
pub use error::{FireflyError, Result};
