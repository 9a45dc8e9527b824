//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod clickhouse_query_executor;

pub use clickhouse_query_executor::ClickHouseQueryExecutor;
