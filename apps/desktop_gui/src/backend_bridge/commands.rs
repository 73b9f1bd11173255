//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    /// `None` when the file dialog was dismissed.
    UploadFile { path: Option<PathBuf> },
    AskQuestion { text: String },
    ClearTranscript,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::UploadFile { .. } => "upload_file",
            BackendCommand::AskQuestion { .. } => "ask_question",
            BackendCommand::ClearTranscript => "clear_transcript",
        }
    }
}
