#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::{config::constants::TITLE_MAX_CHARS, models::Message};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    id: String,
    title: String,
    created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    messages: Vec<Message>,
}

impl Conversation {
    /// Starts a conversation titled after its first question.
    pub fn from_question(question: &str, max_title_chars: usize) -> Self {
        Self::default().with_title(derive_title(question, max_title_chars))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_created_at(mut self, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        self.created_at = timestamp;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.created_at
    }

    /// Time of the latest message, or the creation time of an empty conversation.
    pub fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.messages
            .iter()
            .map(|m| m.timestamp())
            .max()
            .unwrap_or(self.created_at)
            .max(self.created_at)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id() == id)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: "New Chat".to_string(),
            created_at: chrono::Utc::now(),
            messages: vec![],
        }
    }
}

/// Cuts the question down to `max_chars` characters, marking the cut with `...`.
pub fn derive_title(question: &str, max_chars: usize) -> String {
    let max_chars = if max_chars == 0 {
        TITLE_MAX_CHARS
    } else {
        max_chars
    };
    let question = question.trim();
    let mut title: String = question.chars().take(max_chars).collect();
    if question.chars().count() > max_chars {
        title.push_str("...");
    }
    title
}

/// Moves the conversation with `id` to the front, keeping the relative order
/// of the others. Returns false when no such conversation exists.
pub fn move_to_front(conversations: &mut Vec<Conversation>, id: &str) -> bool {
    match conversations.iter().position(|c| c.id() == id) {
        Some(0) => true,
        Some(idx) => {
            let convo = conversations.remove(idx);
            conversations.insert(0, convo);
            true
        }
        None => false,
    }
}
