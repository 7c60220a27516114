use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl ProjectStatus {
    pub fn is_active(self) -> bool {
        matches!(self, ProjectStatus::Planning | ProjectStatus::InProgress)
    }
}

/// A client engagement tracked by recruiters. `progress` is set directly,
/// it is not derived from any task model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementProject {
    pub id: String,
    pub title: String,
    pub client: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Candidate ids.
    #[serde(default)]
    pub team: Vec<String>,
    /// Percent complete, always within 0..=100.
    #[serde(default, deserialize_with = "clamped_progress")]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

pub const MAX_PROGRESS: u8 = 100;

impl ManagementProject {
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(MAX_PROGRESS);
        self
    }
}

/// Accepts any JSON number and pins it into 0..=100.
fn clamped_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round().clamp(0.0, f64::from(MAX_PROGRESS)) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        let s: ProjectStatus = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(s, ProjectStatus::OnHold);
        assert!(!s.is_active());
    }

    #[test]
    fn test_progress_is_clamped() {
        let project = ManagementProject {
            id: "pr9".into(),
            title: "T".into(),
            client: "C".into(),
            description: String::new(),
            status: ProjectStatus::Planning,
            deadline: String::new(),
            tech_stack: vec![],
            team: vec![],
            progress: 0,
            budget: None,
        }
        .with_progress(250);
        assert_eq!(project.progress, 100);
    }

    #[test]
    fn test_decoded_progress_is_clamped() {
        let decode = |progress: &str| -> ManagementProject {
            serde_json::from_str(&format!(
                r#"{{"id": "pr9", "title": "T", "client": "C", "progress": {progress}}}"#
            ))
            .unwrap()
        };
        assert_eq!(decode("250").progress, 100);
        assert_eq!(decode("-5").progress, 0);
        assert_eq!(decode("42.6").progress, 43);

        let missing: ManagementProject =
            serde_json::from_str(r#"{"id": "pr9", "title": "T", "client": "C"}"#).unwrap();
        assert_eq!(missing.progress, 0);
    }
}
