use std::sync::Arc;

use reqwest::Client;
use shared::domain::{ChatMessage, UploadedFile};
use tokio::sync::broadcast;
use tracing::info;

pub mod backend;
pub mod chat;
pub mod http;
mod inflight;
pub mod mock;
pub mod settings;
pub mod transcript;
pub mod upload;

pub use backend::{BackendError, FileContent, FileUpload, QueryBackend, UploadBackend};
pub use chat::ChatController;
pub use http::{HttpQueryBackend, HttpUploadBackend};
pub use mock::{MockQueryBackend, MockUploadBackend};
pub use settings::{load_settings, ClientSettings, SettingsError, SettingsOverrides};
pub use transcript::Transcript;
pub use upload::UploadController;

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// State changes published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    MessageAppended(ChatMessage),
    TranscriptCleared,
    UploadStarted,
    /// The upload left `InFlight`; the file-input control should be reset.
    UploadFinished,
    UploadedFileChanged(Option<UploadedFile>),
    /// The question was recorded; the input box should be cleared.
    QuestionAccepted,
    AnswerSettled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoFileSelected,
    EmptyQuestion,
    UploadRequired,
    InFlight,
}

/// Result of a controller submission. Failures are already in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed,
    Failed,
    Ignored(IgnoreReason),
}

/// Both controllers wired to one transcript and one event stream.
pub struct Session {
    upload: Arc<UploadController>,
    chat: Arc<ChatController>,
    transcript: Transcript,
    events: broadcast::Sender<ClientEvent>,
}

impl Session {
    pub fn new(
        upload_backend: Arc<dyn UploadBackend>,
        query_backend: Arc<dyn QueryBackend>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let transcript = Transcript::new(events.clone());
        let upload = Arc::new(UploadController::new(
            upload_backend,
            transcript.clone(),
            events.clone(),
        ));
        let chat = Arc::new(ChatController::new(
            query_backend,
            transcript.clone(),
            upload.uploaded_file_view(),
            events.clone(),
        ));
        Self {
            upload,
            chat,
            transcript,
            events,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SettingsError> {
        if settings.use_mock {
            info!(delay_ms = settings.mock_delay_ms, "starting session with mock backends");
            return Ok(Self::new(
                Arc::new(MockUploadBackend::new(settings.mock_delay())),
                Arc::new(MockQueryBackend::new(settings.mock_delay())),
            ));
        }

        let upload_endpoint = settings.upload_endpoint()?;
        let query_endpoint = settings.query_endpoint()?;
        info!(
            upload = %upload_endpoint,
            query = %query_endpoint,
            "starting session with HTTP backends"
        );
        let http = Client::new();
        Ok(Self::new(
            Arc::new(HttpUploadBackend::new(http.clone(), upload_endpoint)),
            Arc::new(HttpQueryBackend::new(http, query_endpoint)),
        ))
    }

    pub fn upload(&self) -> &Arc<UploadController> {
        &self.upload
    }

    pub fn chat(&self) -> &Arc<ChatController> {
        &self.chat
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
