//! HTTP transport for the Courtside admin API.
//!
//! One transport is shared by every resource client. It builds request
//! URLs from sparse parameter sets, injects the bearer credential, and
//! normalizes every failure into [`ApiError`]. Retry policy deliberately
//! lives with callers, not here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::CredentialProvider;
use crate::config::Config;

use super::{ApiError, Params};

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Transport for the admin API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    base_url: Arc<str>,
    credentials: Arc<dyn CredentialProvider>,
}

impl Transport {
    /// Create a transport with the default request timeout.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        Self::with_timeout(base_url, credentials, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base: String = base_url.into();
        Ok(Self {
            client,
            base_url: base.trim_end_matches('/').into(),
            credentials,
        })
    }

    pub fn from_config(config: &Config, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        Self::with_timeout(
            config.api_url.clone(),
            credentials,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Perform a request and decode the JSON response.
    ///
    /// `params` become the query string; entries with null or empty-string
    /// values are dropped so callers can pass sparse filters untouched.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path, params)?;
        debug!(%method, %url, "dispatching request");

        let mut request = self.client.request(method, url);
        if let Some(token) = self.credentials.token() {
            if !token.is_empty() {
                request = request.bearer_auth(token);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(self.failure(status, &text));
        }

        decode(&text)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &Params) -> Result<T, ApiError> {
        self.request(Method::GET, path, params, None::<&Value>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, &Params::new(), Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, &Params::new(), Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, &Params::new(), None::<&Value>)
            .await
    }

    fn build_url(&self, path: &str, params: &Params) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::Validation(format!("invalid request URL '{path}': {e}")))?;
        let pairs = params.query_pairs()?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Classify a non-2xx response.
    ///
    /// A 401 clears the session through the credential provider before the
    /// error propagates. This is global policy, not per-call configurable.
    fn failure(&self, status: StatusCode, body: &str) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            warn!("received 401 from API, clearing session");
            self.credentials.clear_session();
        }
        ApiError::from_status(status, body)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    // Some write endpoints reply with an empty body; decode it as null so
    // unit-like result types still work.
    let source = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(source).map_err(|e| ApiError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use super::*;

    #[derive(Default)]
    struct TestCredentials {
        token: Option<String>,
        cleared: AtomicBool,
    }

    impl TestCredentials {
        fn with_token(token: &str) -> Self {
            Self {
                token: Some(token.to_string()),
                cleared: AtomicBool::new(false),
            }
        }
    }

    impl CredentialProvider for TestCredentials {
        fn token(&self) -> Option<String> {
            self.token.clone()
        }

        fn clear_session(&self) {
            self.cleared.store(true, Ordering::SeqCst);
        }
    }

    /// Serve exactly one canned HTTP response and hand back the raw
    /// request head that was received.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut head = String::new();
            let mut buf = [0u8; 4096];
            while !head.contains("\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                head.push_str(&String::from_utf8_lossy(&buf[..n]));
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            let _ = tx.send(head);
        });

        (format!("http://{addr}"), rx)
    }

    #[tokio::test]
    async fn test_sparse_params_build_a_clean_query_string() {
        let (base, head_rx) = one_shot_server("200 OK", "[]").await;
        let creds = Arc::new(TestCredentials::with_token("tok-abc"));
        let transport = Transport::new(base, creds).expect("transport");

        let params = Params::new()
            .with("search", "")
            .with("role", Value::Null)
            .with("status", "active");
        let _: Value = transport.get("/admin/users", &params).await.expect("get");

        let head = head_rx.await.expect("request head");
        let request_line = head.lines().next().unwrap_or_default();
        assert_eq!(request_line, "GET /admin/users?status=active HTTP/1.1");
        assert!(head.contains("authorization: Bearer tok-abc") ||
                head.contains("Authorization: Bearer tok-abc"));
    }

    #[tokio::test]
    async fn test_no_auth_header_without_token() {
        let (base, head_rx) = one_shot_server("200 OK", "{}").await;
        let creds = Arc::new(TestCredentials::default());
        let transport = Transport::new(base, creds).expect("transport");

        let _: Value = transport.get("/admin/venues", &Params::new()).await.expect("get");

        let head = head_rx.await.expect("request head").to_lowercase();
        assert!(!head.contains("authorization:"));
    }

    #[tokio::test]
    async fn test_401_clears_session_and_surfaces_status() {
        let (base, _head_rx) =
            one_shot_server("401 Unauthorized", r#"{"message":"token expired"}"#).await;
        let creds = Arc::new(TestCredentials::with_token("stale-token"));
        let transport = Transport::new(base, Arc::clone(&creds) as Arc<dyn CredentialProvider>)
            .expect("transport");

        let result: Result<Value, ApiError> = transport
            .post("/admin/coaches/5/approve", &serde_json::json!({"notes": "ok"}))
            .await;

        let err = result.expect_err("401 must fail");
        assert_eq!(err.status(), Some(401));
        assert!(creds.cleared.load(Ordering::SeqCst), "session must be cleared");
    }

    #[tokio::test]
    async fn test_non_401_failure_leaves_session_alone() {
        let (base, _head_rx) = one_shot_server("500 Internal Server Error", "boom").await;
        let creds = Arc::new(TestCredentials::with_token("tok"));
        let transport = Transport::new(base, Arc::clone(&creds) as Arc<dyn CredentialProvider>)
            .expect("transport");

        let result: Result<Value, ApiError> = transport.get("/admin/events", &Params::new()).await;
        assert_eq!(result.expect_err("500 must fail").status(), Some(500));
        assert!(!creds.cleared.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_a_parse_error() {
        let (base, _head_rx) = one_shot_server("200 OK", "<html>definitely not json").await;
        let creds = Arc::new(TestCredentials::default());
        let transport = Transport::new(base, creds).expect("transport");

        let result: Result<Value, ApiError> = transport.get("/admin/users", &Params::new()).await;
        match result {
            Err(ApiError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_classification_is_synchronous() {
        let creds = Arc::new(TestCredentials::with_token("tok"));
        let transport = Transport::new(
            "http://localhost:1",
            Arc::clone(&creds) as Arc<dyn CredentialProvider>,
        )
        .expect("transport");

        let err = transport.failure(StatusCode::UNAUTHORIZED, "{}");
        assert!(err.is_unauthorized());
        assert!(creds.cleared.load(Ordering::SeqCst));
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let value: Value = decode("").expect("empty body");
        assert!(value.is_null());
        let value: Option<i64> = decode("  ").expect("blank body");
        assert!(value.is_none());
    }
}
