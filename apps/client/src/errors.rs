use thiserror::Error;

use crate::gateway::GatewayError;
use crate::llm_client::LlmError;
use crate::storage::StorageError;

/// Application-level error type.
///
/// Store operations never surface errors (they commit locally and log remote
/// failures), so this only covers wiring the client together at startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Backend gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}
