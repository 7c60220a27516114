//! Remote gateway: the single seam between the stores and the REST backend.
//!
//! Stores talk to `dyn RemoteGateway`; production wires in [`HttpGateway`],
//! tests wire in a recording fake.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub mod endpoints;
pub mod http;

pub use http::HttpGateway;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server's `message` field when the
    /// body carried one, the status reason otherwise.
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected payload: {0}")]
    Payload(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Transport failures, timeouts, rate limiting and server errors are worth
    /// another attempt; other 4xx and decode failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Http(e) => e.status().map_or(true, |s| s.is_server_error()),
            GatewayError::Status { status, .. } => {
                matches!(*status, 408 | 429) || (500..600).contains(status)
            }
            GatewayError::Parse(_) | GatewayError::Payload(_) => false,
        }
    }
}

/// HTTP verb wrapper. Each call returns the decoded JSON body, or `None` when
/// the response was not JSON.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<Value>, GatewayError>;
    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>, GatewayError>;
    async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>, GatewayError>;
    async fn delete(&self, path: &str) -> Result<Option<Value>, GatewayError>;
}

/// Decodes a gateway body into `T`, treating a missing body as a payload error.
pub fn decode_body<T: DeserializeOwned>(body: Option<Value>) -> Result<T, GatewayError> {
    let value = body.ok_or_else(|| GatewayError::Payload("response had no JSON body".into()))?;
    serde_json::from_value(value).map_err(GatewayError::Parse)
}
