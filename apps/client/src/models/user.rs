use serde::{Deserialize, Serialize};

/// Role the actor signed in as. Drives which screens a session may reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Candidate,
    Recruiter,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    #[serde(default)]
    pub field: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A portfolio entry on a profile. Not to be confused with
/// [`ManagementProject`](crate::models::ManagementProject).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// A member of the network. Relationship sets hold other users' ids and are
/// kept consistent by convention only: `connections` is meant to be symmetric,
/// `following`/`followers` are the two halves of one asymmetric relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default)]
    pub headline: String,
    /// Doubles as the profile summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<PortfolioProject>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default)]
    pub following: Vec<String>,
    #[serde(default)]
    pub followers: Vec<String>,
    #[serde(default)]
    pub is_hiring: bool,
    #[serde(default)]
    pub is_looking_for_job: bool,
}

impl User {
    /// A bare record with empty profile and relationship sets.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            avatar: String::new(),
            banner: None,
            headline: String::new(),
            bio: None,
            phone: None,
            location: None,
            experience: vec![],
            education: vec![],
            skills: vec![],
            soft_skills: vec![],
            technical_skills: vec![],
            projects: vec![],
            languages: vec![],
            connections: vec![],
            following: vec![],
            followers: vec![],
            is_hiring: false,
            is_looking_for_job: false,
        }
    }

    /// Every skill listed on the profile, deduplicated case-insensitively,
    /// in the order first seen.
    pub fn all_skills(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.skills
            .iter()
            .chain(self.technical_skills.iter())
            .chain(self.soft_skills.iter())
            .filter(|s| seen.insert(s.to_lowercase()))
            .cloned()
            .collect()
    }
}

/// Partial update of a [`User`]. Only the fields that are `Some` are merged,
/// and only those are serialised into the remote PUT body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<PortfolioProject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hiring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_looking_for_job: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, user: &mut User) {
        fn merge<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        fn merge_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        merge(&mut user.name, &self.name);
        merge(&mut user.avatar, &self.avatar);
        merge_opt(&mut user.banner, &self.banner);
        merge(&mut user.headline, &self.headline);
        merge_opt(&mut user.bio, &self.bio);
        merge_opt(&mut user.phone, &self.phone);
        merge_opt(&mut user.location, &self.location);
        merge(&mut user.experience, &self.experience);
        merge(&mut user.education, &self.education);
        merge(&mut user.skills, &self.skills);
        merge(&mut user.soft_skills, &self.soft_skills);
        merge(&mut user.technical_skills, &self.technical_skills);
        merge(&mut user.projects, &self.projects);
        merge(&mut user.languages, &self.languages);
        merge(&mut user.is_hiring, &self.is_hiring);
        merge(&mut user.is_looking_for_job, &self.is_looking_for_job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format_is_upper_case() {
        assert_eq!(serde_json::to_string(&UserRole::Recruiter).unwrap(), "\"RECRUITER\"");
        let role: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_partial_server_payload_decodes_with_defaults() {
        let json = serde_json::json!({
            "id": "42",
            "name": "Ada",
            "email": "ada@example.com",
            "technicalSkills": ["Rust"]
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.role, UserRole::Candidate);
        assert!(user.connections.is_empty());
        assert!(user.followers.is_empty());
        assert_eq!(user.technical_skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut user = User::new("u9", "Old", "old@example.com", UserRole::Candidate);
        user.headline = "Keep me".to_string();
        let patch = UserPatch {
            name: Some("New".to_string()),
            bio: Some("Hello".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut user);
        assert_eq!(user.name, "New");
        assert_eq!(user.bio.as_deref(), Some("Hello"));
        assert_eq!(user.headline, "Keep me");
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = UserPatch {
            is_looking_for_job: Some(true),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "isLookingForJob": true }));
        assert!(UserPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_all_skills_dedups_case_insensitively() {
        let mut user = User::new("u9", "A", "a@example.com", UserRole::Candidate);
        user.skills = vec!["React".into(), "AWS".into()];
        user.technical_skills = vec!["react".into(), "Docker".into()];
        user.soft_skills = vec!["Mentoring".into()];
        assert_eq!(user.all_skills(), vec!["React", "AWS", "Docker", "Mentoring"]);
    }
}
