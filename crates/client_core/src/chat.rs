use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::{ChatMessage, UploadedFile};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::{
    backend::QueryBackend, inflight::InFlightGuard, transcript::Transcript, ClientEvent,
    IgnoreReason, SubmitOutcome,
};

pub const UPLOAD_FIRST_MESSAGE: &str = "Please upload a file first.";

pub struct ChatController {
    backend: Arc<dyn QueryBackend>,
    transcript: Transcript,
    uploaded: watch::Receiver<Option<UploadedFile>>,
    awaiting_answer: AtomicBool,
    events: broadcast::Sender<ClientEvent>,
}

impl ChatController {
    pub fn new(
        backend: Arc<dyn QueryBackend>,
        transcript: Transcript,
        uploaded: watch::Receiver<Option<UploadedFile>>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        Self {
            backend,
            transcript,
            uploaded,
            awaiting_answer: AtomicBool::new(false),
            events,
        }
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.awaiting_answer.load(Ordering::Acquire)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn submit_question(&self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyQuestion);
        }
        // A pending answer takes precedence over the upload-first reply.
        if self.is_awaiting_answer() {
            warn!("question already awaiting an answer; ignoring submission");
            return SubmitOutcome::Ignored(IgnoreReason::InFlight);
        }

        let file = self.uploaded.borrow().clone();
        if file.is_none() && self.backend.requires_uploaded_file() {
            self.transcript.push_bot(UPLOAD_FIRST_MESSAGE).await;
            return SubmitOutcome::Ignored(IgnoreReason::UploadRequired);
        }

        let Some(_in_flight) = InFlightGuard::try_enter(
            &self.awaiting_answer,
            &self.events,
            ClientEvent::AnswerSettled,
        ) else {
            warn!("question already awaiting an answer; ignoring submission");
            return SubmitOutcome::Ignored(IgnoreReason::InFlight);
        };

        self.transcript.push(ChatMessage::user(question)).await;
        let _ = self.events.send(ClientEvent::QuestionAccepted);

        let result = self.backend.answer(question, file.as_ref()).await;
        match result {
            Ok(answer) => {
                info!(answer_len = answer.len(), "question answered");
                self.transcript.push_bot(answer).await;
                SubmitOutcome::Completed
            }
            Err(err) => {
                warn!("query failed: {err}");
                self.transcript.push_bot(format!("Error: {err}")).await;
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn clear_transcript(&self) {
        self.transcript.clear().await;
    }
}

#[cfg(test)]
#[path = "tests/chat_tests.rs"]
mod tests;
