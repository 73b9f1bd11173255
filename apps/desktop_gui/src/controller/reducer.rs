//! View state mirrored from session events; rendering reads it, never the session.

use client_core::ClientEvent;
use shared::domain::{ChatMessage, UploadStatus, UploadedFile};

use crate::controller::events::UiEvent;

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub messages: Vec<ChatMessage>,
    pub uploaded_file: Option<UploadedFile>,
    pub uploading: bool,
    pub awaiting_answer: bool,
    pub composer: String,
    /// Name shown next to the file-input control until the upload finishes.
    pub picked_file: Option<String>,
    pub chat_open: bool,
    pub mock_mode: Option<bool>,
    pub status: String,
    pub banner: Option<String>,
}

impl ViewState {
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::SessionReady { mock } => {
                self.mock_mode = Some(mock);
                self.status = if mock {
                    "Ready (mock backend)".to_string()
                } else {
                    "Ready".to_string()
                };
            }
            UiEvent::Error(err) => {
                self.status = format!("{} error: {}", err.label(), err.message());
                self.banner = Some(self.status.clone());
            }
            UiEvent::Client(event) => self.apply_client_event(event),
        }
    }

    fn apply_client_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::MessageAppended(message) => self.messages.push(message),
            ClientEvent::TranscriptCleared => self.messages.clear(),
            ClientEvent::UploadStarted => self.uploading = true,
            ClientEvent::UploadFinished => {
                self.uploading = false;
                self.picked_file = None;
            }
            ClientEvent::UploadedFileChanged(file) => self.uploaded_file = file,
            ClientEvent::QuestionAccepted => {
                self.awaiting_answer = true;
                self.composer.clear();
            }
            ClientEvent::AnswerSettled => self.awaiting_answer = false,
        }
    }

    pub fn upload_status(&self) -> UploadStatus {
        UploadStatus::derive(self.uploading, self.uploaded_file.as_ref())
    }

    pub fn can_ask(&self) -> bool {
        !self.awaiting_answer
    }

    /// Trimmed composer text, or `None` when there is nothing to ask or an answer is pending.
    pub fn pending_question(&self) -> Option<String> {
        if !self.can_ask() {
            return None;
        }
        let question = self.composer.trim();
        (!question.is_empty()).then(|| question.to_string())
    }

    pub fn toggle_chat(&mut self) {
        self.chat_open = !self.chat_open;
    }
}
