//! Assistant features built on the generative-text port.
//!
//! Each feature is its own [`Feature`]: a request shape, a response shape and
//! a fallback. The assistant runs a feature and substitutes the fallback on
//! any failure, so no feature ever returns an error to its caller.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};

pub mod career;
pub mod matching;
pub mod messaging;
pub mod profile;
pub mod projects;
pub mod prompts;

pub use career::{AnalysisOutcome, CareerAnalysis, OpenPosition, RecommendedModule, ResumeFile};
pub use matching::JobMatch;
pub use messaging::{ChatEntry, ChatRole};
pub use projects::ProjectBlueprint;

/// One assistant feature.
pub trait Feature {
    type Output;

    /// Name used in logs.
    const NAME: &'static str;

    fn request(&self) -> GenerationRequest;

    fn parse(&self, text: &str) -> Result<Self::Output, LlmError>;

    fn fallback(&self) -> Self::Output;
}

/// Trims model text and rejects an empty answer.
pub(crate) fn non_empty_text(text: &str) -> Result<String, LlmError> {
    let text = text.trim();
    if text.is_empty() {
        Err(LlmError::EmptyContent)
    } else {
        Ok(text.to_string())
    }
}

#[derive(Clone)]
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Runs `feature`, falling back on transport, API or parse failure.
    pub async fn run<F: Feature + Sync>(&self, feature: &F) -> F::Output {
        let request = feature.request();
        debug!("Running {} on {}", F::NAME, request.model);
        let result = match self.generator.generate(&request).await {
            Ok(text) => feature.parse(&text),
            Err(e) => Err(e),
        };
        match result {
            Ok(output) => output,
            Err(e) => {
                warn!("AI {} error, using fallback: {e}", F::NAME);
                feature.fallback()
            }
        }
    }
}
