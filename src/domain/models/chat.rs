use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

use super::CreateNote;

const MAX_NOTE_TITLE_CHARS: usize = 80;

/// One turn of a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChatMessage {
    /// Speaker of the message (e.g. "user", "assistant")
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// A conversation to be remembered as a note.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    summary: Option<String>,
}

impl ChatTranscript {
    pub fn new(messages: Vec<ChatMessage>, summary: Option<String>) -> Result<Self, DomainError> {
        if messages.iter().all(|m| m.content.trim().is_empty()) {
            return Err(DomainError::invalid_input(
                "a chat needs at least one non-empty message",
            ));
        }
        let summary = summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self { messages, summary })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// First summary line, truncated, or a timestamped fallback.
    pub fn title(&self, now: DateTime<Utc>) -> String {
        let first_line = self
            .summary
            .as_deref()
            .and_then(|s| s.lines().map(str::trim).find(|l| !l.is_empty()));

        match first_line {
            Some(line) if line.chars().count() > MAX_NOTE_TITLE_CHARS => {
                let truncated: String = line.chars().take(MAX_NOTE_TITLE_CHARS - 1).collect();
                format!("{}…", truncated.trim_end())
            }
            Some(line) => line.to_string(),
            None => format!("Chat note {}", now.format("%Y-%m-%d %H:%M UTC")),
        }
    }

    /// Summary (if any) followed by one `role: content` line per message.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(summary) = &self.summary {
            out.push_str(summary);
            out.push_str("\n\n---\n\n");
        }
        let lines: Vec<String> = self
            .messages
            .iter()
            .filter(|m| !m.content.trim().is_empty())
            .map(|m| format!("{}: {}", m.role.trim(), m.content.trim()))
            .collect();
        out.push_str(&lines.join("\n"));
        out
    }

    pub fn into_note(self, now: DateTime<Utc>) -> CreateNote {
        CreateNote {
            title: self.title(now),
            content: self.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn messages() -> Vec<ChatMessage> {
        vec![
            ChatMessage::new("user", "What is a borrow checker?"),
            ChatMessage::new("assistant", "  It enforces aliasing rules.  "),
        ]
    }

    #[test]
    fn test_empty_chat_rejected() {
        assert!(ChatTranscript::new(vec![], None).is_err());
        assert!(ChatTranscript::new(vec![ChatMessage::new("user", " ")], None).is_err());
    }

    #[test]
    fn test_render_with_summary() {
        let chat = ChatTranscript::new(messages(), Some("Borrowing basics".to_string())).unwrap();
        let text = chat.render();

        assert!(text.starts_with("Borrowing basics\n\n---\n\n"));
        assert!(text.ends_with("assistant: It enforces aliasing rules."));
    }

    #[test]
    fn test_title_fallback_uses_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let chat = ChatTranscript::new(messages(), Some("   ".to_string())).unwrap();

        assert!(chat.summary().is_none());
        assert_eq!(chat.title(now), "Chat note 2024-03-01 12:30 UTC");
    }

    #[test]
    fn test_long_title_truncated() {
        let now = Utc::now();
        let chat = ChatTranscript::new(messages(), Some("x".repeat(200))).unwrap();
        let title = chat.title(now);

        assert_eq!(title.chars().count(), MAX_NOTE_TITLE_CHARS);
        assert!(title.ends_with('…'));
    }
}
