use std::sync::Arc;

use tracing::info;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::errors::AppError;
use crate::gateway::{HttpGateway, RemoteGateway};
use crate::llm_client::{DisabledGenerator, LlmClient, TextGenerator, FLASH_MODEL};
use crate::session::SessionStore;
use crate::storage::{FileStore, KeyValueStore};
use crate::store::{DomainStore, Outbox, OutboxWorker};

/// Everything a front end needs, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn KeyValueStore>,
    pub gateway: Arc<dyn RemoteGateway>,
    pub session: Arc<SessionStore>,
    pub store: Arc<DomainStore>,
    /// Backed by `DisabledGenerator` when no API key is configured, so every
    /// feature answers with its fallback.
    pub assistant: Assistant,
}

impl AppState {
    /// Builds the state and the outbox worker that must be run (or drained)
    /// for remote writes to leave the device. Makes no network calls.
    pub fn build(config: Config) -> Result<(Self, OutboxWorker), AppError> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
        info!("Session storage at {}", config.data_dir.display());

        let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(
            config.api_base_url.clone(),
            config.http_timeout,
            storage.clone(),
        )?);
        info!("Backend gateway initialized ({})", config.api_base_url);

        let generator: Arc<dyn TextGenerator> = match &config.gemini_api_key {
            Some(key) => {
                let client = LlmClient::new(config.gemini_api_url.clone(), key.clone())?;
                info!("LLM client initialized (default model: {FLASH_MODEL})");
                Arc::new(client)
            }
            None => {
                info!("GEMINI_API_KEY not set, assistant features will use fallbacks");
                Arc::new(DisabledGenerator)
            }
        };

        let (outbox, worker) = Outbox::channel(gateway.clone(), config.retry_policy());
        let session = Arc::new(SessionStore::new(
            gateway.clone(),
            storage.clone(),
            outbox.clone(),
        ));
        let store = Arc::new(DomainStore::new(
            session.clone(),
            gateway.clone(),
            outbox,
            storage.clone(),
        ));

        let state = AppState {
            config,
            storage,
            gateway,
            session,
            store,
            assistant: Assistant::new(generator),
        };
        Ok((state, worker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use std::time::Duration;

    fn config(data_dir: &std::path::Path) -> Config {
        Config {
            api_base_url: "http://127.0.0.1:9/api".to_string(),
            gemini_api_url: "http://127.0.0.1:9".to_string(),
            gemini_api_key: None,
            data_dir: data_dir.to_path_buf(),
            http_timeout: Duration::from_secs(1),
            outbox_max_attempts: 1,
            outbox_base_delay: Duration::ZERO,
            rust_log: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_wires_seeded_stores_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let (state, _worker) = AppState::build(config(&dir.path().join("data"))).unwrap();

        assert!(dir.path().join("data").is_dir());
        assert_eq!(state.session.state(), SessionState::Uninitialized);
        assert_eq!(state.store.users().len(), 6);

        // No key configured: features answer with their fallbacks.
        assert_eq!(state.assistant.optimize_bio("same", "Ops").await, "same");
    }
}
