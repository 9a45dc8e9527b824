use serde::{Deserialize, Serialize};

// Stand-in detail for a successful statement with an empty response body.
const NO_OUTPUT_PLACEHOLDER: &str = "(no output)";

// Transport-level status reported for every completed sweep, including
// sweeps with per-target failures.
const SWEEP_STATUS_CODE: u16 = 200;

/// Outcome category for one cleanup target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupStatus {
    /// Delete statement completed.
    Ok,
    /// Delete statement failed; the sweep continued with later targets.
    Error,
}

impl CleanupStatus {
    /// Returns a stable storage value for the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Recorded outcome of one cleanup target within a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResult {
    table: String,
    status: CleanupStatus,
    detail: String,
}

impl CleanupResult {
    /// Records a completed delete, normalizing the raw response body.
    #[must_use]
    pub fn success(table: impl Into<String>, raw_output: &str) -> Self {
        let trimmed = raw_output.trim();
        let detail = if trimmed.is_empty() {
            NO_OUTPUT_PLACEHOLDER.to_owned()
        } else {
            trimmed.to_owned()
        };

        Self {
            table: table.into(),
            status: CleanupStatus::Ok,
            detail,
        }
    }

    /// Records a failed delete with its failure description.
    #[must_use]
    pub fn failure(table: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            status: CleanupStatus::Error,
            detail: detail.into(),
        }
    }

    /// Returns the database-qualified table name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    /// Returns the outcome category.
    #[must_use]
    pub fn status(&self) -> CleanupStatus {
        self.status
    }

    /// Returns the trimmed response body or the failure description.
    #[must_use]
    pub fn detail(&self) -> &str {
        self.detail.as_str()
    }
}

/// Ordered per-target outcomes of one complete sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    status_code: u16,
    results: Vec<CleanupResult>,
}

impl RunSummary {
    /// Wraps per-target results; partial failures stay inside the results
    /// and never change the outer status.
    #[must_use]
    pub fn new(results: Vec<CleanupResult>) -> Self {
        Self {
            status_code: SWEEP_STATUS_CODE,
            results,
        }
    }

    /// Returns the transport-level status code.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the per-target results in execution order.
    #[must_use]
    pub fn results(&self) -> &[CleanupResult] {
        self.results.as_slice()
    }

    /// Counts targets that failed.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.status() == CleanupStatus::Error)
            .count()
    }

    /// Check if any target failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.error_count() > 0
    }
}
