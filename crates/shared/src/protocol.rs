use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::UploadedFile;

/// Key used when the upload endpoint answers without `key` or `filename`.
pub const FALLBACK_FILE_KEY: &str = "filekey";

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Upload endpoint reply. Fields are untyped JSON; any non-null value is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
}

impl UploadResponse {
    pub fn into_uploaded_file(self) -> UploadedFile {
        UploadedFile {
            key: value_text(self.key)
                .or_else(|| value_text(self.filename))
                .unwrap_or_else(|| FALLBACK_FILE_KEY.to_string()),
            url: value_text(self.url),
        }
    }
}

/// Strings verbatim, other non-null values as JSON text, null as absent.
fn value_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(rename = "fileKey")]
    pub file_key: String,
}

/// Text shown for a query response body.
///
/// A string `answer` is used as-is, any other non-null `answer` is rendered as JSON, and a
/// body without a usable `answer` is rendered whole.
pub fn answer_text(body: &Value) -> String {
    match body.get("answer") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => body.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn upload_response_prefers_key_then_filename_then_placeholder() {
        let with_key: UploadResponse =
            serde_json::from_value(json!({"key": "k1", "filename": "a.pdf", "url": "https://x/a"}))
                .expect("decode");
        assert_eq!(
            with_key.into_uploaded_file(),
            UploadedFile {
                key: "k1".to_string(),
                url: Some("https://x/a".to_string()),
            }
        );

        let with_filename: UploadResponse =
            serde_json::from_value(json!({"filename": "a.pdf"})).expect("decode");
        assert_eq!(with_filename.into_uploaded_file().key, "a.pdf");

        let empty: UploadResponse = serde_json::from_value(json!({})).expect("decode");
        let file = empty.into_uploaded_file();
        assert_eq!(file.key, FALLBACK_FILE_KEY);
        assert_eq!(file.url, None);
    }

    #[test]
    fn upload_response_accepts_non_string_values() {
        let numeric: UploadResponse =
            serde_json::from_value(json!({"key": 42, "url": null})).expect("decode");
        assert_eq!(
            numeric.into_uploaded_file(),
            UploadedFile {
                key: "42".to_string(),
                url: None,
            }
        );

        let null_key: UploadResponse =
            serde_json::from_value(json!({"key": null, "filename": 7})).expect("decode");
        assert_eq!(null_key.into_uploaded_file().key, "7");
    }

    #[test]
    fn query_request_uses_camel_case_file_key() {
        let body = serde_json::to_value(QueryRequest {
            question: "what is the total?".to_string(),
            file_key: "k1".to_string(),
        })
        .expect("encode");
        assert_eq!(body, json!({"question": "what is the total?", "fileKey": "k1"}));
    }

    #[test]
    fn answer_text_handles_strings_values_and_missing_answers() {
        assert_eq!(answer_text(&json!({"answer": "John Doe"})), "John Doe");
        assert_eq!(answer_text(&json!({"answer": 42})), "42");
        assert_eq!(
            answer_text(&json!({"answer": ["a", "b"]})),
            r#"["a","b"]"#
        );
        assert_eq!(answer_text(&json!({"result": "x"})), r#"{"result":"x"}"#);
        assert_eq!(answer_text(&json!({"answer": null})), r#"{"answer":null}"#);
    }
}
