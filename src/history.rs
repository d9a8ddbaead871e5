//! Conversation history types
//!
//! An in-memory, append-only record of one chat session. Entries are
//! immutable once appended and are replayed verbatim (oldest first) as
//! provider history on every turn. Nothing here is persisted: the store
//! lives and dies with the session.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder `raw_message` for assistant entries. The real content lives
/// in the structured payload; history replay sends this sentinel.
pub const ASSISTANT_RAW_PLACEHOLDER: &str = "[structured reply]";

/// Who produced a chat entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire-format role string for the Chat Completions API
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// How the rendering boundary should display an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayKind {
    PlainText,
    StructuredMarkdown,
}

/// Decoded assistant reply: all fields optional, an empty payload is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(rename = "programmingLanguage", skip_serializing_if = "Option::is_none")]
    pub programming_language: Option<String>,
}

impl AssistantPayload {
    pub fn is_empty(&self) -> bool {
        self.feedback.is_none()
            && self.hints.is_empty()
            && self.snippet.is_none()
            && self.programming_language.is_none()
    }
}

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: String,
    pub role: Role,
    pub display_kind: DisplayKind,
    /// Free text: the submitted text for user entries, a fixed sentinel
    /// for assistant entries. This is what history replay sends.
    pub raw_message: String,
    /// Present only on assistant entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<AssistantPayload>,
    pub created_at: i64,
}

impl ChatEntry {
    /// Entry for a submitted user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            display_kind: DisplayKind::PlainText,
            raw_message: text.into(),
            payload: None,
            created_at: Utc::now().timestamp(),
        }
    }

    /// Entry for a successfully parsed assistant reply
    pub fn assistant(payload: AssistantPayload) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            display_kind: DisplayKind::StructuredMarkdown,
            raw_message: ASSISTANT_RAW_PLACEHOLDER.into(),
            payload: Some(payload),
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Append-only, chronologically ordered store of chat entries.
///
/// No deduplication, no capping: unbounded growth for the life of the
/// session is accepted behavior.
#[derive(Debug, Default)]
pub struct ConversationStore {
    entries: Vec<ChatEntry>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry at the tail. Entries are never reordered or removed.
    pub fn append(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    /// Full ordered sequence, oldest first, for rendering and for
    /// history replay
    pub fn snapshot(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
