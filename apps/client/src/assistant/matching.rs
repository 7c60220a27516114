//! Candidate/job match scoring.

use serde::{Deserialize, Serialize};

use crate::assistant::{prompts, Assistant, Feature};
use crate::llm_client::{
    parse_json_text, prompts::JSON_ONLY_SYSTEM, GenerationRequest, LlmError, PRO_MODEL,
};
use crate::models::{Job, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    /// 0 to 100.
    pub score: u8,
    pub reasoning: String,
    pub gap_analysis: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJobMatch {
    score: f64,
    reasoning: String,
    gap_analysis: String,
}

impl From<RawJobMatch> for JobMatch {
    fn from(raw: RawJobMatch) -> Self {
        let score = if raw.score.is_finite() {
            raw.score.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        Self {
            score,
            reasoning: raw.reasoning,
            gap_analysis: raw.gap_analysis,
        }
    }
}

pub struct JobMatchRequest<'a> {
    pub user: &'a User,
    pub job: &'a Job,
}

impl Feature for JobMatchRequest<'_> {
    type Output = Option<JobMatch>;
    const NAME: &'static str = "job analysis";

    fn request(&self) -> GenerationRequest {
        let prompt = prompts::JOB_MATCH_PROMPT_TEMPLATE
            .replace("{headline}", &self.user.headline)
            .replace("{skills}", &self.user.all_skills().join(", "))
            .replace("{title}", &self.job.title)
            .replace("{requirements}", &self.job.requirements.join(", "))
            .replace("{description}", &self.job.description);
        GenerationRequest::prompt(PRO_MODEL, prompt)
            .with_system(JSON_ONLY_SYSTEM)
            .expecting_json()
    }

    fn parse(&self, text: &str) -> Result<Option<JobMatch>, LlmError> {
        let raw: RawJobMatch = parse_json_text(text)?;
        Ok(Some(raw.into()))
    }

    fn fallback(&self) -> Option<JobMatch> {
        None
    }
}

impl Assistant {
    /// Scores how well `user` fits `job`. `None` when no analysis could be made.
    pub async fn analyze_job_match(&self, user: &User, job: &Job) -> Option<JobMatch> {
        self.run(&JobMatchRequest { user, job }).await
    }
}
