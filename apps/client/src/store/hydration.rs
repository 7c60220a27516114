//! Startup hydration: fetch posts, jobs and users concurrently and adopt
//! each one independently.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::gateway::{decode_body, GatewayError, RemoteGateway};

/// What happened to one collection during hydration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adoption {
    /// The server list replaced the local one; carries its length.
    Replaced(usize),
    /// The fetch failed or returned something other than a list.
    Kept,
}

impl Adoption {
    pub fn is_replaced(self) -> bool {
        matches!(self, Adoption::Replaced(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationReport {
    /// No actor was signed in, so nothing was fetched.
    pub skipped: bool,
    pub posts: Adoption,
    pub jobs: Adoption,
    pub users: Adoption,
}

impl HydrationReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            posts: Adoption::Kept,
            jobs: Adoption::Kept,
            users: Adoption::Kept,
        }
    }
}

/// Fetches `path` and decodes it as a list. Anything that is not a JSON
/// array is rejected, even if it would otherwise decode.
pub(crate) async fn fetch_list<T: DeserializeOwned>(
    gateway: &dyn RemoteGateway,
    path: &str,
) -> Result<Vec<T>, GatewayError> {
    match gateway.get(path).await? {
        body @ Some(Value::Array(_)) => decode_body(body),
        _ => Err(GatewayError::Payload(format!("{path} did not return a list"))),
    }
}
