use std::sync::Arc;

use rowsweep_domain::{CleanupResult, CleanupTarget, RunSummary};

use crate::store_port::StoreQueryExecutor;

/// Sweep service enforcing retention windows target by target.
pub struct RetentionSweeper {
    executor: Arc<dyn StoreQueryExecutor>,
    targets: Vec<CleanupTarget>,
}

impl RetentionSweeper {
    /// Creates a sweeper over an injected store executor and target list.
    #[must_use]
    pub fn new(executor: Arc<dyn StoreQueryExecutor>, targets: Vec<CleanupTarget>) -> Self {
        Self { executor, targets }
    }

    /// Runs one sweep: one delete statement per target, in declared order.
    ///
    /// A failed target is recorded and never aborts the remainder of the
    /// sweep; every configured target yields exactly one result.
    pub async fn run(&self) -> RunSummary {
        let mut results = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            let table = target.qualified_table_name().as_str();
            let statement = target.delete_statement();
            tracing::info!(table, statement = %statement, "running cleanup statement");

            let result = match self.executor.execute_statement(statement.as_str()).await {
                Ok(output) => {
                    let result = CleanupResult::success(table, output.as_str());
                    tracing::info!(table, detail = result.detail(), "cleanup statement completed");
                    result
                }
                Err(error) => {
                    tracing::error!(table, error = %error, "cleanup statement failed");
                    CleanupResult::failure(table, error.to_string())
                }
            };

            results.push(result);
        }

        RunSummary::new(results)
    }
}
