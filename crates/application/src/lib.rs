//! Application services and ports.

#![forbid(unsafe_code)]

mod store_port;
mod sweeper_service;

pub use store_port::{StoreQueryError, StoreQueryExecutor};
pub use sweeper_service::RetentionSweeper;
