use rowsweep_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Retention window class for a cleanup target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionClass {
    /// Application data tables.
    App,
    /// Server-side system and log tables.
    System,
}

impl RetentionClass {
    /// Returns a stable storage value for the class.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::System => "system",
        }
    }
}

/// Per-class retention windows, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    app_days: u32,
    system_days: u32,
}

impl RetentionPolicy {
    /// Creates a policy with validated per-class windows.
    pub fn new(app_days: u32, system_days: u32) -> AppResult<Self> {
        if app_days == 0 || system_days == 0 {
            return Err(AppError::Validation(
                "retention windows must be at least one day".to_owned(),
            ));
        }

        Ok(Self {
            app_days,
            system_days,
        })
    }

    /// Returns the window, in days, for one target class.
    #[must_use]
    pub fn days_for(&self, class: RetentionClass) -> u32 {
        match class {
            RetentionClass::App => self.app_days,
            RetentionClass::System => self.system_days,
        }
    }
}

/// One table subject to cleanup: where to delete and how far back to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupTarget {
    qualified_table_name: NonEmptyString,
    retention_days: u32,
    date_column: NonEmptyString,
}

impl CleanupTarget {
    /// Creates a cleanup target with validated fields.
    pub fn new(
        qualified_table_name: impl Into<String>,
        retention_days: u32,
        date_column: impl Into<String>,
    ) -> AppResult<Self> {
        if retention_days == 0 {
            return Err(AppError::Validation(
                "retention window must be at least one day".to_owned(),
            ));
        }

        Ok(Self {
            qualified_table_name: NonEmptyString::new(qualified_table_name)?,
            retention_days,
            date_column: NonEmptyString::new(date_column)?,
        })
    }

    /// Returns the database-qualified table name.
    #[must_use]
    pub fn qualified_table_name(&self) -> &NonEmptyString {
        &self.qualified_table_name
    }

    /// Returns the window, in days, rows in this table are kept.
    #[must_use]
    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    /// Returns the column row age is measured against.
    #[must_use]
    pub fn date_column(&self) -> &NonEmptyString {
        &self.date_column
    }

    /// Builds the delete mutation removing rows older than the window.
    ///
    /// Row age is evaluated server-side against the store's own clock.
    #[must_use]
    pub fn delete_statement(&self) -> String {
        format!(
            "ALTER TABLE {} DELETE WHERE {} < now() - INTERVAL {} DAY",
            self.qualified_table_name, self.date_column, self.retention_days
        )
    }
}

// Tables swept on every run, in execution order.
const CLEANUP_CATALOG: [(&str, RetentionClass, &str); 5] = [
    ("default.observations", RetentionClass::App, "created_at"),
    ("default.traces", RetentionClass::App, "timestamp"),
    (
        "system.opentelemetry_span_log",
        RetentionClass::System,
        "start_time_us",
    ),
    ("system.query_log", RetentionClass::System, "event_time"),
    (
        "system.processors_profile_log",
        RetentionClass::System,
        "event_time",
    ),
];

/// Resolves the fixed table catalog against a policy, preserving catalog order.
pub fn cleanup_targets(policy: &RetentionPolicy) -> AppResult<Vec<CleanupTarget>> {
    CLEANUP_CATALOG
        .iter()
        .map(|(table, class, date_column)| {
            CleanupTarget::new(*table, policy.days_for(*class), *date_column)
        })
        .collect()
}
