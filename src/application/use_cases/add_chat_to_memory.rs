use chrono::Utc;
use tracing::info;

use crate::domain::{ChatMessage, ChatTranscript, CreatedSource, DomainError};

use super::CreateSourceUseCase;

/// Stores a chat conversation as a `note` source in the given web.
pub struct AddChatToMemoryUseCase {
    create_source: CreateSourceUseCase,
}

impl AddChatToMemoryUseCase {
    pub fn new(create_source: CreateSourceUseCase) -> Self {
        Self { create_source }
    }

    pub async fn execute(
        &self,
        user_id: &str,
        web_id: &str,
        messages: Vec<ChatMessage>,
        summary: Option<String>,
    ) -> Result<CreatedSource, DomainError> {
        let transcript = ChatTranscript::new(messages, summary)?;
        let message_count = transcript.messages().len();

        let note = transcript.into_note(Utc::now());
        info!(
            "Remembering chat of {} messages as note '{}'",
            message_count, note.title
        );

        self.create_source
            .execute(note.into_source(user_id, web_id))
            .await
    }
}
