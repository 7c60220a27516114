//! Reqwest-backed gateway against the REST backend.
//!
//! Owns transport details only: headers, bearer token, JSON decoding and
//! error normalisation. Retry policy lives in the outbox, not here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::{GatewayError, RemoteGateway};
use crate::storage::{KeyValueStore, AUTH_TOKEN_KEY};

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    storage: Arc<dyn KeyValueStore>,
}

impl HttpGateway {
    /// Builds a gateway with an explicit request timeout. The bearer token is
    /// read from `storage` on every call, so sign-in takes effect immediately.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
        })
    }

    fn token(&self) -> Option<String> {
        match self.storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read auth token: {e}");
                None
            }
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("API {method} {path} failed: {e}");
            GatewayError::Http(e)
        })?;
        debug!("API {method} {path} -> {}", response.status());
        self.handle_response(response).await
    }

    async fn handle_response(&self, response: Response) -> Result<Option<Value>, GatewayError> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = response.text().await?;
        let data = if is_json && !text.trim().is_empty() {
            if status.is_success() {
                Some(serde_json::from_str::<Value>(&text)?)
            } else {
                // Error bodies are best-effort: a malformed one still yields the status.
                serde_json::from_str::<Value>(&text).ok()
            }
        } else {
            None
        };

        if status.is_success() {
            return Ok(data);
        }

        if status.as_u16() == 401 {
            if let Err(e) = self.storage.remove(AUTH_TOKEN_KEY) {
                warn!("Could not clear rejected auth token: {e}");
            }
        }

        let message = data
            .as_ref()
            .and_then(|d| d.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string()
            });

        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn get(&self, path: &str) -> Result<Option<Value>, GatewayError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>, GatewayError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>, GatewayError> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>, GatewayError> {
        self.send(Method::DELETE, path, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::{delete, get, post, put},
        Json, Router,
    };
    use serde_json::json;

    async fn whoami(headers: HeaderMap) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let accept = headers
            .get("accept")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "authorization": auth, "accept": accept }))
    }

    async fn echo(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({ "received": body }))
    }

    async fn expired() -> (StatusCode, Json<Value>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token has expired" })),
        )
    }

    async fn boom() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom")
    }

    async fn plain() -> &'static str {
        "ok"
    }

    async fn spawn_backend() -> String {
        let router = Router::new()
            .route("/api/user", get(whoami))
            .route("/api/posts", post(echo))
            .route("/api/user/:id", put(echo))
            .route("/api/expired", get(expired))
            .route("/api/boom", get(boom))
            .route("/api/plain", delete(plain));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/api/")
    }

    fn gateway(base: String, storage: Arc<MemoryStore>) -> HttpGateway {
        HttpGateway::new(base, Duration::from_secs(5), storage).unwrap()
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_and_accept_headers() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(AUTH_TOKEN_KEY, "secret").unwrap();
        let gw = gateway(spawn_backend().await, storage);

        let body = gw.get("/user").await.unwrap().unwrap();
        assert_eq!(body["authorization"], "Bearer secret");
        assert_eq!(body["accept"], "application/json");
    }

    #[tokio::test]
    async fn test_get_without_token_sends_no_authorization() {
        let gw = gateway(spawn_backend().await, Arc::new(MemoryStore::new()));
        let body = gw.get("/user").await.unwrap().unwrap();
        assert!(body["authorization"].is_null());
    }

    #[tokio::test]
    async fn test_post_and_put_send_json_bodies() {
        let gw = gateway(spawn_backend().await, Arc::new(MemoryStore::new()));

        let posted = gw.post("/posts", &json!({ "content": "hi" })).await.unwrap();
        assert_eq!(posted.unwrap()["received"]["content"], "hi");

        let put = gw.put("/user/u1", &json!({ "bio": "new" })).await.unwrap();
        assert_eq!(put.unwrap()["received"]["bio"], "new");
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token_and_carries_server_message() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(AUTH_TOKEN_KEY, "stale").unwrap();
        let gw = gateway(spawn_backend().await, storage.clone());

        let err = gw.get("/expired").await.unwrap_err();
        match err {
            GatewayError::Status { status, ref message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Token has expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_json_error_falls_back_to_status_text() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(AUTH_TOKEN_KEY, "keep").unwrap();
        let gw = gateway(spawn_backend().await, storage.clone());

        let err = gw.get("/boom").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Internal Server Error"));
        // Only a 401 clears the token.
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("keep"));
    }

    #[tokio::test]
    async fn test_non_json_success_yields_none() {
        let gw = gateway(spawn_backend().await, Arc::new(MemoryStore::new()));
        assert!(gw.delete("/plain").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_retryable_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let gw = gateway(format!("http://{addr}"), Arc::new(MemoryStore::new()));

        let err = gw.get("/posts").await.unwrap_err();
        assert!(matches!(err, GatewayError::Http(_)));
        assert!(err.is_retryable());
    }
}
