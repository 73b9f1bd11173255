use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Identifier of a file accepted by the upload backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    NoFile,
    Uploading,
    Uploaded,
}

impl UploadStatus {
    pub fn derive(uploading: bool, file: Option<&UploadedFile>) -> Self {
        if uploading {
            Self::Uploading
        } else if file.is_some() {
            Self::Uploaded
        } else {
            Self::NoFile
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoFile => "No file",
            Self::Uploading => "Uploading...",
            Self::Uploaded => "Uploaded",
        }
    }
}
