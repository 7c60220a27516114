//! Project-idea expansion into a tracked project.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::assistant::{prompts, Assistant, Feature};
use crate::llm_client::{
    parse_json_text, prompts::JSON_ONLY_SYSTEM, GenerationRequest, LlmError, FLASH_MODEL,
};
use crate::models::{new_id, ManagementProject, ProjectStatus};

/// Days from today to the deadline of a generated project.
const DEFAULT_RUNWAY_DAYS: i64 = 90;

/// The model's answer. Every field is optional; gaps are filled when the
/// blueprint becomes a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectBlueprint {
    pub title: Option<String>,
    pub client: Option<String>,
    pub description: Option<String>,
    pub tech_stack: Vec<String>,
    pub duration: Option<String>,
    pub estimated_budget: Option<String>,
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProjectBlueprint {
    /// A `Planning` project at 0% with an empty team, due 90 days after
    /// `today`. Missing text falls back to placeholders and the raw idea.
    pub fn into_project(self, idea: &str, today: NaiveDate) -> ManagementProject {
        let deadline = today + Duration::days(DEFAULT_RUNWAY_DAYS);
        ManagementProject {
            id: new_id(),
            title: filled(self.title).unwrap_or_else(|| "Generated Project".to_string()),
            client: filled(self.client).unwrap_or_else(|| "Internal".to_string()),
            description: filled(self.description).unwrap_or_else(|| idea.to_string()),
            status: ProjectStatus::Planning,
            deadline: deadline.format("%Y-%m-%d").to_string(),
            tech_stack: self.tech_stack,
            team: vec![],
            progress: 0,
            budget: filled(self.estimated_budget),
        }
    }
}

pub struct ProjectIdea<'a> {
    pub idea: &'a str,
}

impl Feature for ProjectIdea<'_> {
    type Output = Option<ProjectBlueprint>;
    const NAME: &'static str = "project generation";

    fn request(&self) -> GenerationRequest {
        let prompt = prompts::PROJECT_BLUEPRINT_PROMPT_TEMPLATE.replace("{idea}", self.idea);
        GenerationRequest::prompt(FLASH_MODEL, prompt)
            .with_system(JSON_ONLY_SYSTEM)
            .expecting_json()
    }

    fn parse(&self, text: &str) -> Result<Option<ProjectBlueprint>, LlmError> {
        Ok(Some(parse_json_text(text)?))
    }

    fn fallback(&self) -> Option<ProjectBlueprint> {
        None
    }
}

impl Assistant {
    pub async fn generate_project_blueprint(&self, idea: &str) -> Option<ProjectBlueprint> {
        self.run(&ProjectIdea { idea }).await
    }

    /// Expands `idea` into a project ready for
    /// [`DomainStore::add_project`](crate::store::DomainStore::add_project).
    pub async fn generate_project(&self, idea: &str) -> Option<ManagementProject> {
        let blueprint = self.generate_project_blueprint(idea).await?;
        Some(blueprint.into_project(idea, Utc::now().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeGenerator;
    use std::sync::Arc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_blueprint_becomes_planning_project() {
        let blueprint = ProjectBlueprint {
            title: Some("Fleet Tracker".into()),
            client: Some("Acme Logistics".into()),
            description: Some("Real-time tracking.".into()),
            tech_stack: vec!["Rust".into(), "Postgres".into()],
            duration: Some("3 months".into()),
            estimated_budget: Some("$50,000".into()),
        };

        let project = blueprint.into_project("track trucks", day(2024, 1, 1));
        assert_eq!(project.title, "Fleet Tracker");
        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.progress, 0);
        assert!(project.team.is_empty());
        assert_eq!(project.deadline, "2024-03-31");
        assert_eq!(project.budget.as_deref(), Some("$50,000"));
    }

    #[test]
    fn test_empty_blueprint_uses_placeholders() {
        let project = ProjectBlueprint::default().into_project("a todo app", day(2025, 6, 1));
        assert_eq!(project.title, "Generated Project");
        assert_eq!(project.client, "Internal");
        assert_eq!(project.description, "a todo app");
        assert_eq!(project.budget, None);
    }

    #[tokio::test]
    async fn test_generate_project_from_model_json() {
        let generator = FakeGenerator::replying([
            r#"```json
{"title": "Clinic Scheduler", "client": "MedCo", "techStack": ["React", "Rust"], "estimatedBudget": "$80,000"}
```"#,
        ]);
        let assistant = Assistant::new(Arc::new(generator.clone()));

        let project = assistant.generate_project("booking for clinics").await.unwrap();
        assert_eq!(project.title, "Clinic Scheduler");
        assert_eq!(project.tech_stack, vec!["React", "Rust"]);
        assert_eq!(project.description, "booking for clinics");
        assert_eq!(generator.requests()[0].model, FLASH_MODEL);
    }

    #[tokio::test]
    async fn test_generate_project_failure_yields_none() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::failing()));
        assert!(assistant.generate_project("anything").await.is_none());
    }
}
