use std::time::Duration;

use async_trait::async_trait;
use rowsweep_application::{StoreQueryError, StoreQueryExecutor};
use rowsweep_core::NonEmptyString;

// Login the ClickHouse HTTP interface authenticates the sweep as.
const STORE_USER: &str = "default";

/// ClickHouse HTTP interface implementation of the store query port.
pub struct ClickHouseQueryExecutor {
    http_client: reqwest::Client,
    base_url: String,
    password: NonEmptyString,
    query_timeout: Duration,
}

impl ClickHouseQueryExecutor {
    /// Creates an executor against one ClickHouse HTTP endpoint.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        password: NonEmptyString,
        query_timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            password,
            query_timeout,
        }
    }

    fn classify_request_error(&self, error: &reqwest::Error) -> StoreQueryError {
        if error.is_timeout() {
            StoreQueryError::Timeout {
                timeout: self.query_timeout,
            }
        } else {
            StoreQueryError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl StoreQueryExecutor for ClickHouseQueryExecutor {
    async fn execute_statement(&self, statement: &str) -> Result<String, StoreQueryError> {
        let response = self
            .http_client
            .post(self.base_url.as_str())
            .query(&[("user", STORE_USER), ("password", self.password.as_str())])
            .timeout(self.query_timeout)
            .body(statement.to_owned())
            .send()
            .await
            .map_err(|error| self.classify_request_error(&error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(StoreQueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|error| self.classify_request_error(&error))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rowsweep_application::{StoreQueryError, StoreQueryExecutor};
    use rowsweep_core::NonEmptyString;
    use wiremock::matchers::{body_string, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::ClickHouseQueryExecutor;

    const STATEMENT: &str =
        "ALTER TABLE default.traces DELETE WHERE timestamp < now() - INTERVAL 30 DAY";

    fn executor(base_url: &str, query_timeout: Duration) -> ClickHouseQueryExecutor {
        let password = NonEmptyString::new("sweep-secret").unwrap_or_else(|_| unreachable!());
        ClickHouseQueryExecutor::new(reqwest::Client::new(), base_url, password, query_timeout)
    }

    #[tokio::test]
    async fn posts_statement_with_store_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(query_param("user", "default"))
            .and(query_param("password", "sweep-secret"))
            .and(body_string(STATEMENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("0 rows in set\n"))
            .expect(1)
            .mount(&server)
            .await;

        let executor = executor(server.uri().as_str(), Duration::from_secs(5));
        let result = executor.execute_statement(STATEMENT).await;

        assert!(result.is_ok());
        // The adapter hands the body back untouched; trimming happens in the
        // result entity.
        assert_eq!(result.unwrap_or_default(), "0 rows in set\n");
    }

    #[tokio::test]
    async fn maps_non_success_status_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_string("Code: 241. DB::Exception"),
            )
            .mount(&server)
            .await;

        let executor = executor(server.uri().as_str(), Duration::from_secs(5));
        let result = executor.execute_statement(STATEMENT).await;

        match result {
            Err(StoreQueryError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("Code: 241"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_unreachable_endpoint_to_transport_error() {
        let executor = executor("http://127.0.0.1:1", Duration::from_secs(5));
        let result = executor.execute_statement(STATEMENT).await;

        assert!(matches!(result, Err(StoreQueryError::Transport(_))));
    }

    #[tokio::test]
    async fn maps_exhausted_deadline_to_timeout_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(250)),
            )
            .mount(&server)
            .await;

        let executor = executor(server.uri().as_str(), Duration::from_millis(50));
        let result = executor.execute_statement(STATEMENT).await;

        assert!(matches!(result, Err(StoreQueryError::Timeout { .. })));
    }
}
