//! Profile writing: bio rewrite and resume generation.

use crate::assistant::{non_empty_text, prompts, Assistant, Feature};
use crate::llm_client::{
    prompts::NO_FABRICATION_INSTRUCTION, GenerationRequest, LlmError, FLASH_MODEL, PRO_MODEL,
};
use crate::models::User;

pub const RESUME_FAILURE_TEXT: &str = "Failed to generate resume. Please try again later.";

pub struct BioRewrite<'a> {
    pub bio: &'a str,
    pub headline: &'a str,
}

impl Feature for BioRewrite<'_> {
    type Output = String;
    const NAME: &'static str = "bio optimization";

    fn request(&self) -> GenerationRequest {
        let prompt = prompts::BIO_PROMPT_TEMPLATE
            .replace("{headline}", self.headline)
            .replace("{bio}", self.bio);
        GenerationRequest::prompt(FLASH_MODEL, prompt).with_temperature(0.7)
    }

    fn parse(&self, text: &str) -> Result<String, LlmError> {
        non_empty_text(text)
    }

    /// The bio is left as it was.
    fn fallback(&self) -> String {
        self.bio.to_string()
    }
}

pub struct ResumeDraft<'a> {
    pub user: &'a User,
}

fn json_or_empty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

impl Feature for ResumeDraft<'_> {
    type Output = String;
    const NAME: &'static str = "resume generation";

    fn request(&self) -> GenerationRequest {
        let user = self.user;
        let skills = user.all_skills();
        let prompt = prompts::RESUME_PROMPT_TEMPLATE
            .replace("{name}", &user.name)
            .replace("{headline}", &user.headline)
            .replace("{bio}", user.bio.as_deref().unwrap_or("Not provided"))
            .replace(
                "{skills}",
                &if skills.is_empty() {
                    "Not listed".to_string()
                } else {
                    skills.join(", ")
                },
            )
            .replace("{experience_json}", &json_or_empty(&user.experience))
            .replace("{education_json}", &json_or_empty(&user.education))
            .replace("{projects_json}", &json_or_empty(&user.projects))
            .replace("{grounding_instruction}", NO_FABRICATION_INSTRUCTION);
        GenerationRequest::prompt(PRO_MODEL, prompt)
    }

    fn parse(&self, text: &str) -> Result<String, LlmError> {
        non_empty_text(text)
    }

    fn fallback(&self) -> String {
        RESUME_FAILURE_TEXT.to_string()
    }
}

impl Assistant {
    /// Rewrites a bio in under 100 words. Returns `bio` unchanged on failure.
    pub async fn optimize_bio(&self, bio: &str, headline: &str) -> String {
        self.run(&BioRewrite { bio, headline }).await
    }

    /// Markdown resume for `user`.
    pub async fn generate_resume(&self, user: &User) -> String {
        self.run(&ResumeDraft { user }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::test_support::FakeGenerator;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_optimize_bio_uses_flash_at_temperature_point_seven() {
        let generator = FakeGenerator::replying(["  A sharper bio.  "]);
        let assistant = Assistant::new(Arc::new(generator.clone()));

        let bio = assistant.optimize_bio("Old bio", "Data Science").await;
        assert_eq!(bio, "A sharper bio.");

        let request = &generator.requests()[0];
        assert_eq!(request.model, FLASH_MODEL);
        assert_eq!(request.temperature, Some(0.7));
        assert!(request.user_text().contains("Data Science"));
        assert!(request.user_text().contains("\"Old bio\""));
    }

    #[tokio::test]
    async fn test_optimize_bio_falls_back_to_original() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::failing()));
        assert_eq!(assistant.optimize_bio("Keep me", "Ops").await, "Keep me");
    }

    #[tokio::test]
    async fn test_empty_bio_answer_counts_as_failure() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::replying(["   "])));
        assert_eq!(assistant.optimize_bio("Keep me", "Ops").await, "Keep me");
    }

    #[tokio::test]
    async fn test_generate_resume_sends_profile_to_pro_model() {
        let generator = FakeGenerator::replying(["# Sarah Connor"]);
        let assistant = Assistant::new(Arc::new(generator.clone()));
        let sarah = seed::users().remove(0);

        assert_eq!(assistant.generate_resume(&sarah).await, "# Sarah Connor");
        let request = &generator.requests()[0];
        assert_eq!(request.model, PRO_MODEL);
        let prompt = request.user_text();
        assert!(prompt.contains("Name: Sarah Connor"));
        assert!(prompt.contains("Tech Solutions Inc."));
        assert!(!prompt.contains("{experience_json}"));
    }

    #[tokio::test]
    async fn test_generate_resume_fallback_text() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::failing()));
        let user = seed::users().remove(5);
        assert_eq!(assistant.generate_resume(&user).await, RESUME_FAILURE_TEXT);
    }
}
