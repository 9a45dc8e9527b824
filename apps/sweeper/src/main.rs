//! Rowsweep retention sweeper runtime.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use rowsweep_application::RetentionSweeper;
use rowsweep_core::{AppError, AppResult, NonEmptyString};
use rowsweep_domain::{RetentionPolicy, cleanup_targets};
use rowsweep_infrastructure::ClickHouseQueryExecutor;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Ceiling for one delete mutation round trip. A hung call exhausts this
// bound and is recorded as a failure for that target only.
const QUERY_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
struct SweeperConfig {
    host: String,
    port: u16,
    password: NonEmptyString,
    app_retention_days: u32,
    system_retention_days: u32,
}

impl SweeperConfig {
    fn load() -> AppResult<Self> {
        let host = env::var("CLICKHOUSE_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let port = parse_env_u16("CLICKHOUSE_PORT", 30123)?;
        let password = NonEmptyString::new(required_env("CLICKHOUSE_PASSWORD")?)?;
        let app_retention_days = parse_env_u32("RETENTION_DAYS_APP", 30)?;
        let system_retention_days = parse_env_u32("RETENTION_DAYS_SYSTEM", 10)?;

        Ok(Self {
            host,
            port,
            password,
            app_retention_days,
            system_retention_days,
        })
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SweeperConfig::load()?;
    let policy = RetentionPolicy::new(config.app_retention_days, config.system_retention_days)?;
    let targets = cleanup_targets(&policy)?;

    info!(
        host = %config.host,
        port = config.port,
        "starting clickhouse cleanup sweep"
    );
    info!(
        app_retention_days = config.app_retention_days,
        system_retention_days = config.system_retention_days,
        "retention windows loaded"
    );

    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let executor = Arc::new(ClickHouseQueryExecutor::new(
        http_client,
        config.base_url(),
        config.password.clone(),
        QUERY_TIMEOUT,
    ));

    let sweeper = RetentionSweeper::new(executor, targets);
    let summary = sweeper.run().await;

    info!(
        targets = summary.results().len(),
        failed = summary.error_count(),
        "cleanup sweep complete"
    );

    let rendered = serde_json::to_string(&summary)
        .map_err(|error| AppError::Internal(format!("failed to render sweep summary: {error}")))?;
    println!("{rendered}");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u16(name: &str, default: u16) -> AppResult<u16> {
    match env::var(name) {
        Ok(value) => value.parse::<u16>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::SweeperConfig;

    #[test]
    fn load_fails_without_password() {
        temp_env::with_vars([("CLICKHOUSE_PASSWORD", None::<&str>)], || {
            assert!(SweeperConfig::load().is_err());
        });
    }

    #[test]
    fn load_rejects_blank_password() {
        temp_env::with_vars([("CLICKHOUSE_PASSWORD", Some("   "))], || {
            assert!(SweeperConfig::load().is_err());
        });
    }

    #[test]
    fn load_applies_documented_defaults() {
        temp_env::with_vars(
            [
                ("CLICKHOUSE_PASSWORD", Some("sweep-secret")),
                ("CLICKHOUSE_HOST", None),
                ("CLICKHOUSE_PORT", None),
                ("RETENTION_DAYS_APP", None),
                ("RETENTION_DAYS_SYSTEM", None),
            ],
            || {
                let config = SweeperConfig::load();
                assert!(config.is_ok());
                let config = config.unwrap_or_else(|_| unreachable!());
                assert_eq!(config.host, "127.0.0.1");
                assert_eq!(config.port, 30123);
                assert_eq!(config.app_retention_days, 30);
                assert_eq!(config.system_retention_days, 10);
                assert_eq!(config.base_url(), "http://127.0.0.1:30123/");
            },
        );
    }

    #[test]
    fn load_rejects_unparseable_port() {
        temp_env::with_vars(
            [
                ("CLICKHOUSE_PASSWORD", Some("sweep-secret")),
                ("CLICKHOUSE_PORT", Some("nodeport")),
            ],
            || {
                assert!(SweeperConfig::load().is_err());
            },
        );
    }

    #[test]
    fn load_reads_overridden_windows() {
        temp_env::with_vars(
            [
                ("CLICKHOUSE_PASSWORD", Some("sweep-secret")),
                ("RETENTION_DAYS_APP", Some("45")),
                ("RETENTION_DAYS_SYSTEM", Some("7")),
            ],
            || {
                let config = SweeperConfig::load().unwrap_or_else(|_| unreachable!());
                assert_eq!(config.app_retention_days, 45);
                assert_eq!(config.system_retention_days, 7);
            },
        );
    }
}
