use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{new_id, User};

/// A feed post. Author fields are a snapshot taken at creation time; they do
/// not follow later edits of the author's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: String,
    #[serde(default)]
    pub author_headline: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub timestamp: DateTime<Utc>,
}

impl Post {
    pub fn new(author: &User, content: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id: new_id(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            author_avatar: author.avatar.clone(),
            author_headline: author.headline.clone(),
            content: content.into(),
            image,
            likes: vec![],
            comments: vec![],
            timestamp: Utc::now(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }
}

/// Append-only; comments are never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: &User, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
