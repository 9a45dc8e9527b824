use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes for one statement execution against the store.
#[derive(Debug, Error)]
pub enum StoreQueryError {
    /// Connection or protocol failure before a usable response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived with a non-success HTTP status.
    #[error("store returned status {status}: {body}")]
    Status {
        /// Numeric HTTP status returned by the store.
        status: u16,
        /// Response body, or a stand-in when it could not be read.
        body: String,
    },

    /// No response within the configured deadline.
    #[error("store call timed out after {timeout:?}")]
    Timeout {
        /// Deadline the call was bounded by.
        timeout: Duration,
    },
}

/// Port for executing one SQL statement against the data store.
#[async_trait]
pub trait StoreQueryExecutor: Send + Sync {
    /// Executes one statement and returns the raw response body.
    async fn execute_statement(&self, statement: &str) -> Result<String, StoreQueryError>;
}
