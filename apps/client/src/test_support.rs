//! In-memory doubles for the two outbound ports.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::{GatewayError, RemoteGateway};
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};

/// One request observed by [`FakeGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

type Outcome = Result<Option<Value>, u16>;

/// Gateway double. Responses are scripted per `METHOD path`; scripted
/// outcomes are consumed in order and the last one repeats. Unscripted
/// requests fail with a 503.
#[derive(Clone, Default)]
pub struct FakeGateway {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    scripts: Arc<Mutex<HashMap<String, VecDeque<Outcome>>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self, method: &str, path: &str, outcome: Outcome) {
        self.scripts
            .lock()
            .unwrap()
            .entry(format!("{method} {path}"))
            .or_default()
            .push_back(outcome);
    }

    pub fn respond(&self, method: &str, path: &str, body: Value) -> &Self {
        self.script(method, path, Ok(Some(body)));
        self
    }

    pub fn respond_empty(&self, method: &str, path: &str) -> &Self {
        self.script(method, path, Ok(None));
        self
    }

    pub fn fail(&self, method: &str, path: &str, status: u16) -> &Self {
        self.script(method, path, Err(status));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    fn handle(
        &self,
        method: &'static str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, GatewayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
        let mut scripts = self.scripts.lock().unwrap();
        let outcome = match scripts.get_mut(&format!("{method} {path}")) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or(Err(503)),
            None => Err(503),
        };
        outcome.map_err(|status| GatewayError::Status {
            status,
            message: format!("scripted failure {status}"),
        })
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn get(&self, path: &str) -> Result<Option<Value>, GatewayError> {
        self.handle("GET", path, None)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>, GatewayError> {
        self.handle("POST", path, Some(body))
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Option<Value>, GatewayError> {
        self.handle("PUT", path, Some(body))
    }

    async fn delete(&self, path: &str) -> Result<Option<Value>, GatewayError> {
        self.handle("DELETE", path, None)
    }
}

/// Generator double. Replies are consumed in order; once exhausted every call
/// fails, which exercises the fallback paths.
#[derive(Clone, Default)]
pub struct FakeGenerator {
    replies: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl FakeGenerator {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(
                replies.into_iter().map(Into::into).collect(),
            )),
            requests: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(text) => Ok(text),
            None => Err(LlmError::Api {
                status: 503,
                message: "fake generator unavailable".into(),
            }),
        }
    }
}
