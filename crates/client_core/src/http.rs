//! Backends forwarding to the external upload and query endpoints.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde_json::Value;
use shared::{
    domain::UploadedFile,
    protocol::{answer_text, QueryRequest, UploadResponse, UPLOAD_FIELD},
};
use tracing::debug;
use url::Url;

use crate::backend::{BackendError, FileUpload, QueryBackend, UploadBackend};

fn ensure_success(response: Response, operation: &'static str) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::Status { operation, status })
    }
}

pub struct HttpUploadBackend {
    http: Client,
    endpoint: Url,
}

impl HttpUploadBackend {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl UploadBackend for HttpUploadBackend {
    async fn upload(&self, file: &FileUpload) -> Result<UploadedFile, BackendError> {
        let bytes = file.read_bytes().await?;
        let size_bytes = bytes.len();
        let mut part = Part::bytes(bytes).file_name(file.filename.clone());
        if let Some(mime_type) = &file.mime_type {
            part = part.mime_str(mime_type)?;
        }
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(endpoint = %self.endpoint, filename = %file.filename, size_bytes, "posting upload");
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let text = ensure_success(response, "Upload")?.text().await?;
        let body: UploadResponse = serde_json::from_str(&text)?;
        Ok(body.into_uploaded_file())
    }
}

pub struct HttpQueryBackend {
    http: Client,
    endpoint: Url,
}

impl HttpQueryBackend {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl QueryBackend for HttpQueryBackend {
    async fn answer(
        &self,
        question: &str,
        file: Option<&UploadedFile>,
    ) -> Result<String, BackendError> {
        let file = file.ok_or(BackendError::MissingUploadedFile)?;
        let payload = QueryRequest {
            question: question.to_string(),
            file_key: file.key.clone(),
        };

        debug!(endpoint = %self.endpoint, file_key = %file.key, "posting query");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;
        let text = ensure_success(response, "Query")?.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(answer_text(&body))
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
