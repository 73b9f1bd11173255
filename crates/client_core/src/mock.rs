//! Offline backends with fixed latency and canned results.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shared::domain::UploadedFile;
use url::Url;
use uuid::Uuid;

use crate::backend::{BackendError, FileUpload, QueryBackend, UploadBackend};

pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(700);

pub const NAME_ANSWER: &str = "Mock: The name found is John Doe.";
pub const DATE_ANSWER: &str = "Mock: The document date is 2025-07-01.";
pub const AMOUNT_ANSWER: &str = "Mock: Total amount found is ₹12,345.";

const AMOUNT_KEYWORDS: [&str; 3] = ["total", "amount", "price"];

/// Canned reply for `question`, picked by case-insensitive keyword match.
pub fn mock_answer(question: &str) -> String {
    let lower = question.to_lowercase();
    if lower.contains("name") {
        NAME_ANSWER.to_string()
    } else if lower.contains("date") {
        DATE_ANSWER.to_string()
    } else if AMOUNT_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        AMOUNT_ANSWER.to_string()
    } else {
        format!(
            "Mock (echo): I saw your question — \"{question}\". I can search for names, dates, totals, or summaries."
        )
    }
}

/// `file://` URL for path-backed uploads (relative paths resolved against the working
/// directory), `blob:<uuid>` otherwise.
fn preview_reference(file: &FileUpload) -> String {
    file.local_path()
        .and_then(|path| std::path::absolute(path).ok())
        .and_then(|path| Url::from_file_path(path).ok())
        .map(String::from)
        .unwrap_or_else(|| format!("blob:{}", Uuid::new_v4()))
}

pub struct MockUploadBackend {
    delay: Duration,
}

impl MockUploadBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockUploadBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_DELAY)
    }
}

#[async_trait]
impl UploadBackend for MockUploadBackend {
    async fn upload(&self, file: &FileUpload) -> Result<UploadedFile, BackendError> {
        tokio::time::sleep(self.delay).await;
        Ok(UploadedFile {
            key: format!("mock-{}", Utc::now().timestamp_millis()),
            url: Some(preview_reference(file)),
        })
    }

    fn success_message(&self, filename: &str) -> String {
        format!("File \"{filename}\" uploaded (mock).")
    }
}

pub struct MockQueryBackend {
    delay: Duration,
}

impl MockQueryBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockQueryBackend {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_DELAY)
    }
}

#[async_trait]
impl QueryBackend for MockQueryBackend {
    async fn answer(
        &self,
        question: &str,
        _file: Option<&UploadedFile>,
    ) -> Result<String, BackendError> {
        tokio::time::sleep(self.delay).await;
        Ok(mock_answer(question))
    }

    fn requires_uploaded_file(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[path = "tests/mock_tests.rs"]
mod tests;
