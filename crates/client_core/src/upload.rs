use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::{UploadStatus, UploadedFile};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::{
    backend::{FileUpload, UploadBackend},
    inflight::InFlightGuard,
    transcript::Transcript,
    ClientEvent, IgnoreReason, SubmitOutcome,
};

pub struct UploadController {
    backend: Arc<dyn UploadBackend>,
    transcript: Transcript,
    uploaded: watch::Sender<Option<UploadedFile>>,
    uploading: AtomicBool,
    events: broadcast::Sender<ClientEvent>,
}

impl UploadController {
    pub fn new(
        backend: Arc<dyn UploadBackend>,
        transcript: Transcript,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        let (uploaded, _) = watch::channel(None);
        Self {
            backend,
            transcript,
            uploaded,
            uploading: AtomicBool::new(false),
            events,
        }
    }

    /// Read-only view of the current upload, handed to the chat controller.
    pub fn uploaded_file_view(&self) -> watch::Receiver<Option<UploadedFile>> {
        self.uploaded.subscribe()
    }

    pub fn uploaded_file(&self) -> Option<UploadedFile> {
        self.uploaded.borrow().clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::Acquire)
    }

    pub fn status(&self) -> UploadStatus {
        UploadStatus::derive(self.is_uploading(), self.uploaded.borrow().as_ref())
    }

    pub async fn submit_file(&self, file: Option<FileUpload>) -> SubmitOutcome {
        let Some(file) = file else {
            return SubmitOutcome::Ignored(IgnoreReason::NoFileSelected);
        };
        let Some(_in_flight) =
            InFlightGuard::try_enter(&self.uploading, &self.events, ClientEvent::UploadFinished)
        else {
            warn!(filename = %file.filename, "upload already in progress; ignoring submission");
            return SubmitOutcome::Ignored(IgnoreReason::InFlight);
        };

        let _ = self.events.send(ClientEvent::UploadStarted);
        self.set_uploaded_file(None);

        let result = self.backend.upload(&file).await;
        match result {
            Ok(uploaded) => {
                info!(filename = %file.filename, key = %uploaded.key, "file uploaded");
                self.set_uploaded_file(Some(uploaded));
                self.transcript
                    .push_bot(self.backend.success_message(&file.filename))
                    .await;
                SubmitOutcome::Completed
            }
            Err(err) => {
                warn!(filename = %file.filename, "upload failed: {err}");
                self.transcript.push_bot(format!("Upload error: {err}")).await;
                SubmitOutcome::Failed
            }
        }
    }

    fn set_uploaded_file(&self, file: Option<UploadedFile>) {
        self.uploaded.send_replace(file.clone());
        let _ = self.events.send(ClientEvent::UploadedFileChanged(file));
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
