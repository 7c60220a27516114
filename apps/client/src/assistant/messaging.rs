//! Smart replies and the assistant chat.

use serde::{Deserialize, Serialize};

use crate::assistant::{non_empty_text, prompts, Assistant, Feature};
use crate::llm_client::{
    parse_json_text, prompts::PLATFORM_CONTEXT, GenerationRequest, LlmError, Speaker, Turn,
    FLASH_MODEL,
};
use crate::models::User;

pub const CANNED_REPLIES: [&str; 3] = ["Thank you!", "Let's connect.", "Sounds great."];

pub const CHAT_FAILURE_TEXT: &str = "Sorry, I'm having connection issues. Please try again later.";

const MAX_REPLIES: usize = 3;

pub struct SmartReplies<'a> {
    pub last_message: &'a str,
}

impl Feature for SmartReplies<'_> {
    type Output = Vec<String>;
    const NAME: &'static str = "smart reply";

    fn request(&self) -> GenerationRequest {
        let prompt = prompts::SMART_REPLIES_PROMPT_TEMPLATE.replace("{message}", self.last_message);
        GenerationRequest::prompt(FLASH_MODEL, prompt).expecting_json()
    }

    fn parse(&self, text: &str) -> Result<Vec<String>, LlmError> {
        let replies: Vec<String> = parse_json_text(text)?;
        Ok(replies
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .take(MAX_REPLIES)
            .collect())
    }

    fn fallback(&self) -> Vec<String> {
        CANNED_REPLIES.iter().map(|r| r.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

/// One line of the chat transcript as the widget keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub content: String,
}

pub struct ChatTurn<'a> {
    pub message: &'a str,
    pub history: &'a [ChatEntry],
    pub actor: Option<&'a User>,
}

impl ChatTurn<'_> {
    fn member_context(&self) -> String {
        match self.actor {
            Some(user) => format!(
                "You are talking to {} ({:?}), whose headline is \"{}\".",
                user.name, user.role, user.headline
            ),
            None => "The visitor is not signed in.".to_string(),
        }
    }
}

impl Feature for ChatTurn<'_> {
    type Output = String;
    const NAME: &'static str = "chat";

    fn request(&self) -> GenerationRequest {
        let system = prompts::CHAT_SYSTEM_TEMPLATE
            .replace("{platform_context}", PLATFORM_CONTEXT)
            .replace("{member}", &self.member_context());

        // The provider expects the conversation to open with a user turn, so
        // the widget's greeting is dropped.
        let mut turns: Vec<Turn> = self
            .history
            .iter()
            .skip_while(|e| e.role == ChatRole::Bot)
            .map(|e| Turn {
                speaker: match e.role {
                    ChatRole::User => Speaker::User,
                    ChatRole::Bot => Speaker::Model,
                },
                text: e.content.clone(),
            })
            .collect();
        turns.push(Turn {
            speaker: Speaker::User,
            text: self.message.to_string(),
        });

        let mut request = GenerationRequest::prompt(FLASH_MODEL, "").with_system(system);
        request.turns = turns;
        request
    }

    fn parse(&self, text: &str) -> Result<String, LlmError> {
        non_empty_text(text)
    }

    fn fallback(&self) -> String {
        CHAT_FAILURE_TEXT.to_string()
    }
}

impl Assistant {
    /// Up to three short replies to `last_message`.
    pub async fn smart_replies(&self, last_message: &str) -> Vec<String> {
        self.run(&SmartReplies { last_message }).await
    }

    pub async fn chat(&self, message: &str, history: &[ChatEntry], actor: Option<&User>) -> String {
        self.run(&ChatTurn {
            message,
            history,
            actor,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::test_support::FakeGenerator;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_smart_replies_keep_at_most_three() {
        let generator = FakeGenerator::replying([r#"["Sure!", " ", "Thanks", "Talk soon", "Bye"]"#]);
        let assistant = Assistant::new(Arc::new(generator.clone()));

        let replies = assistant.smart_replies("Are you free Tuesday?").await;
        assert_eq!(replies, vec!["Sure!", "Thanks", "Talk soon"]);
        assert!(generator.requests()[0].json_output);
    }

    #[tokio::test]
    async fn test_smart_replies_fall_back_to_canned() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::replying(["not json"])));
        assert_eq!(
            assistant.smart_replies("Hi").await,
            vec!["Thank you!", "Let's connect.", "Sounds great."]
        );
    }

    #[tokio::test]
    async fn test_chat_sends_history_as_turns_after_greeting() {
        let generator = FakeGenerator::replying(["Try the Jobs tab."]);
        let assistant = Assistant::new(Arc::new(generator.clone()));
        let sarah = seed::users().remove(0);
        let history = vec![
            ChatEntry {
                role: ChatRole::Bot,
                content: "Hi Sarah! How can I help?".into(),
            },
            ChatEntry {
                role: ChatRole::User,
                content: "Hello".into(),
            },
            ChatEntry {
                role: ChatRole::Bot,
                content: "Hi!".into(),
            },
        ];

        let answer = assistant.chat("Where are jobs?", &history, Some(&sarah)).await;
        assert_eq!(answer, "Try the Jobs tab.");

        let request = &generator.requests()[0];
        let speakers: Vec<_> = request.turns.iter().map(|t| t.speaker).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Model, Speaker::User]);
        assert_eq!(request.turns[2].text, "Where are jobs?");
        assert!(request.system.as_deref().unwrap().contains("Sarah Connor"));
    }

    #[tokio::test]
    async fn test_chat_failure_text() {
        let assistant = Assistant::new(Arc::new(FakeGenerator::failing()));
        assert_eq!(assistant.chat("hi", &[], None).await, CHAT_FAILURE_TEXT);
    }
}
