#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::models::QueryResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    #[default]
    None,
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: String,
    #[serde(alias = "type")]
    role: Role,
    #[serde(default)]
    content: String,
    #[serde(default)]
    user_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<QueryResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    is_loading: bool,
    #[serde(default)]
    feedback: Feedback,
    #[serde(default = "default_true")]
    feedback_prompt: bool,
}

fn default_true() -> bool {
    true
}

impl Message {
    pub fn new_user(question: impl Into<String>) -> Self {
        let question = question.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            content: question.clone(),
            user_query: question,
            sql: None,
            result: None,
            error: None,
            timestamp: chrono::Utc::now(),
            is_loading: false,
            feedback: Feedback::None,
            feedback_prompt: false,
        }
    }

    /// Creates the loading placeholder that answers `question`.
    pub fn new_pending(question: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: String::new(),
            user_query: question.into(),
            sql: None,
            result: None,
            error: None,
            timestamp: chrono::Utc::now(),
            is_loading: true,
            feedback: Feedback::None,
            feedback_prompt: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: chrono::DateTime<chrono::Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::Utc> {
        self.timestamp
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn status(&self) -> MessageStatus {
        if self.is_loading {
            return MessageStatus::Pending;
        }

        let execution_failed = self.result.as_ref().is_some_and(|r| r.is_failed());
        if self.error.is_some() || execution_failed {
            MessageStatus::Failed
        } else {
            MessageStatus::Succeeded
        }
    }

    /// A feedback prompt is offered only for a settled answer that returned rows
    /// and has not been rated yet.
    pub fn wants_feedback(&self) -> bool {
        self.feedback_prompt
            && self.feedback == Feedback::None
            && self.status() == MessageStatus::Succeeded
            && self.result.as_ref().is_some_and(|r| !r.rows().is_empty())
    }

    /// Puts the message back into the loading state for a new generation cycle.
    pub fn reset_pending(&mut self, feedback_prompt: bool) {
        self.content.clear();
        self.sql = None;
        self.result = None;
        self.error = None;
        self.is_loading = true;
        self.feedback = Feedback::None;
        self.feedback_prompt = feedback_prompt;
        self.timestamp = chrono::Utc::now();
    }

    /// Settles the message with an executed query. Execution failures live in
    /// `result.error`.
    pub fn complete(
        &mut self,
        content: impl Into<String>,
        sql: impl Into<String>,
        result: QueryResult,
    ) {
        self.content = content.into();
        self.sql = Some(sql.into());
        self.result = Some(result);
        self.error = None;
        self.is_loading = false;
        self.feedback = Feedback::None;
        self.timestamp = chrono::Utc::now();
    }

    /// Settles the message without any SQL; used when translation failed.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.content.clear();
        self.sql = None;
        self.result = None;
        self.error = Some(error.into());
        self.is_loading = false;
        self.feedback = Feedback::None;
        self.timestamp = chrono::Utc::now();
    }

    /// Applies a feedback value. Only `none -> yes` and `none -> no` are
    /// accepted; re-applying the current value is a no-op success.
    pub fn set_feedback(&mut self, feedback: Feedback) -> bool {
        if self.feedback == feedback {
            return true;
        }
        if self.feedback != Feedback::None || feedback == Feedback::None {
            return false;
        }
        self.feedback = feedback;
        true
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::None => write!(f, "none"),
            Feedback::Yes => write!(f, "yes"),
            Feedback::No => write!(f, "no"),
        }
    }
}

impl std::str::FromStr for Feedback {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Feedback::None),
            "yes" | "y" => Ok(Feedback::Yes),
            "no" | "n" => Ok(Feedback::No),
            other => Err(eyre::eyre!("invalid feedback value: {other}")),
        }
    }
}

impl Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageStatus::Pending => write!(f, "pending"),
            MessageStatus::Succeeded => write!(f, "succeeded"),
            MessageStatus::Failed => write!(f, "failed"),
        }
    }
}
