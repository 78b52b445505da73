use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, status_error};
use crate::query::{Filter, Select, filter_query};
use crate::store::{ClientFactory, TableStore};

/// Header carrying the caller's claimed access key.
pub const USER_KEY_HEADER: &str = "x-user-key";

/// Where the table store lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            timeout,
        }
    }
}

/// HTTP client for a PostgREST-compatible table store.
///
/// Every request carries the project anon key (`apikey` plus bearer auth) and
/// the caller's access key in `x-user-key`. The access key is fixed at
/// construction; build a new client to switch keys.
#[derive(Clone)]
pub struct TableClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    user_key: String,
}

impl TableClient {
    /// Create a new client with its own connection pool.
    pub fn new(config: &BackendConfig, user_key: Option<&str>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Build)?;
        Ok(Self::with_client(client, config, user_key))
    }

    /// Create from an existing `reqwest::Client` (shared pool).
    pub fn with_client(client: reqwest::Client, config: &BackendConfig, user_key: Option<&str>) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            user_key: user_key.unwrap_or_default().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}/rest/v1/{}", self.base_url, table)
        } else {
            format!("{}/rest/v1/{}?{}", self.base_url, table, query)
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(USER_KEY_HEADER, &self.user_key)
    }
}

impl TableStore for TableClient {
    fn user_key(&self) -> &str {
        &self.user_key
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), ApiError> {
        let url = self.url(table, "");
        debug!(table, "insert");
        let resp = self
            .request(Method::POST, &url)
            .header("Prefer", "return=minimal")
            .json(&Value::Array(vec![row]))
            .send()
            .await?;
        check_status(resp).await.map(drop)
    }

    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Value>, ApiError> {
        let url = self.url(table, &query.to_query());
        debug!(table, query = %query.to_query(), "select");
        let resp = self.request(Method::GET, &url).send().await?;
        let resp = check_status(resp).await?;
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), ApiError> {
        let url = self.url(table, &filter_query(filters));
        debug!(table, "delete");
        let resp = self.request(Method::DELETE, &url).send().await?;
        check_status(resp).await.map(drop)
    }
}

/// Pass 2xx responses through; turn anything else into [`ApiError::Status`].
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), &body))
}

/// Builds [`TableClient`]s that share one connection pool.
#[derive(Clone)]
pub struct HttpClientFactory {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpClientFactory {
    pub fn new(config: BackendConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Build)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

impl ClientFactory for HttpClientFactory {
    type Client = TableClient;

    fn build(&self, user_key: Option<&str>) -> Result<TableClient, ApiError> {
        Ok(TableClient::with_client(
            self.client.clone(),
            &self.config,
            user_key,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept a single connection, answer with `status` and `body`, and hand
    /// back the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&buf).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
        let content_length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= head_end + 4 + content_length
    }

    fn client_for(url: &str, user_key: Option<&str>) -> TableClient {
        let config = BackendConfig::new(url, "anon-123", Duration::from_secs(5));
        HttpClientFactory::new(config)
            .expect("factory")
            .build(user_key)
            .expect("client")
    }

    #[tokio::test]
    async fn select_sends_filters_and_identity_headers() {
        let (url, server) = serve_once("200 OK", r#"[{"name":"ada"}]"#).await;
        let client = client_for(&url, Some("key-1"));

        let rows = client
            .select(
                "entries",
                &Select::all().eq("user_key", "key-1").order_desc("created_at"),
            )
            .await
            .expect("select");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "ada");

        let request = server.await.expect("server").to_lowercase();
        assert!(request.starts_with("get /rest/v1/entries?select=*&user_key=eq.key-1&order=created_at.desc "));
        assert!(request.contains("apikey: anon-123"));
        assert!(request.contains("authorization: bearer anon-123"));
        assert!(request.contains("x-user-key: key-1"));
    }

    #[tokio::test]
    async fn insert_posts_a_single_row_array() {
        let (url, server) = serve_once("201 Created", "").await;
        let client = client_for(&url, Some("key-2"));

        client
            .insert("keys", serde_json::json!({"user_key": "key-2"}))
            .await
            .expect("insert");

        let request = server.await.expect("server");
        let lower = request.to_lowercase();
        assert!(lower.starts_with("post /rest/v1/keys "));
        assert!(lower.contains("prefer: return=minimal"));
        assert!(request.ends_with(r#"[{"user_key":"key-2"}]"#));
    }

    #[tokio::test]
    async fn signed_out_client_sends_empty_user_key() {
        let (url, server) = serve_once("204 No Content", "").await;
        let client = client_for(&url, None);
        assert_eq!(client.user_key(), "");

        client
            .delete("entries", &[Filter::eq("id", "e-1")])
            .await
            .expect("delete");

        let request = server.await.expect("server").to_lowercase();
        assert!(request.starts_with("delete /rest/v1/entries?id=eq.e-1 "));
        assert!(request.contains("x-user-key: \r\n") || request.contains("x-user-key:\r\n"));
    }

    #[tokio::test]
    async fn error_status_maps_backend_message() {
        let (url, server) = serve_once(
            "409 Conflict",
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        )
        .await;
        let client = client_for(&url, Some("key-3"));

        let err = client
            .insert("journals", serde_json::json!({"user_key": "key-3"}))
            .await
            .expect_err("conflict");
        server.await.expect("server");

        assert_eq!(err.status(), Some(409));
        assert_eq!(
            err.message(),
            "duplicate key value violates unique constraint"
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = client_for(&format!("http://{addr}"), Some("key-4"));
        let err = client
            .select("keys", &Select::all())
            .await
            .expect_err("connection refused");
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
