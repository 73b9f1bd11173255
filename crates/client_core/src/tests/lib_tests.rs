use super::*;

use axum::http::StatusCode;
use serde_json::json;
use shared::domain::{Sender, UploadStatus};

use crate::{
    chat::UPLOAD_FIRST_MESSAGE,
    test_support::{spawn_stub_server, unreachable_base_url},
};

fn mock_settings() -> ClientSettings {
    ClientSettings {
        mock_delay_ms: 0,
        ..ClientSettings::default()
    }
}

fn live_settings(upload_url: &str, query_url: &str) -> ClientSettings {
    ClientSettings {
        upload_url: upload_url.to_string(),
        query_url: query_url.to_string(),
        use_mock: false,
        mock_delay_ms: 0,
    }
}

#[tokio::test]
async fn mock_session_uploads_and_answers_without_network() {
    let session = Session::from_settings(&mock_settings()).expect("session");

    let outcome = session
        .upload()
        .submit_file(Some(FileUpload::from_bytes("invoice.pdf", b"%PDF".to_vec())))
        .await;
    assert_eq!(outcome, SubmitOutcome::Completed);
    assert_eq!(session.upload().status(), UploadStatus::Uploaded);

    session.chat().submit_question("What's the date?").await;

    let messages = session.transcript().snapshot().await;
    assert_eq!(
        messages,
        vec![
            ChatMessage::bot("File \"invoice.pdf\" uploaded (mock)."),
            ChatMessage::user("What's the date?"),
            ChatMessage::bot(mock::DATE_ANSWER),
        ]
    );
}

#[tokio::test]
async fn live_session_requires_upload_before_querying() {
    let server = spawn_stub_server(
        (StatusCode::OK, json!({"key": "k"})),
        (StatusCode::OK, json!({"answer": "unused"})),
    )
    .await;
    let session = Session::from_settings(&live_settings(
        server.upload_url().as_str(),
        server.query_url().as_str(),
    ))
    .expect("session");

    let outcome = session.chat().submit_question("total?").await;

    assert_eq!(outcome, SubmitOutcome::Ignored(IgnoreReason::UploadRequired));
    assert_eq!(
        session.transcript().snapshot().await,
        vec![ChatMessage::bot(UPLOAD_FIRST_MESSAGE)]
    );
    assert!(server.queries().await.is_empty());
}

#[tokio::test]
async fn live_upload_failure_leaves_no_file_and_one_error_message() {
    let server = spawn_stub_server(
        (StatusCode::BAD_REQUEST, json!({"error": "bad file"})),
        (StatusCode::OK, json!({})),
    )
    .await;
    let session = Session::from_settings(&live_settings(
        server.upload_url().as_str(),
        server.query_url().as_str(),
    ))
    .expect("session");

    let outcome = session
        .upload()
        .submit_file(Some(FileUpload::from_bytes("a.csv", b"a,b".to_vec())))
        .await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.upload().uploaded_file(), None);
    let messages = session.transcript().snapshot().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert!(
        messages[0].text.starts_with("Upload error:"),
        "unexpected: {}",
        messages[0].text
    );
}

#[tokio::test]
async fn live_session_queries_with_the_uploaded_key() {
    let server = spawn_stub_server(
        (StatusCode::OK, json!({"key": "srv-42", "url": "https://files/srv-42"})),
        (StatusCode::OK, json!({"answer": "Total is 99"})),
    )
    .await;
    let session = Session::from_settings(&live_settings(
        server.upload_url().as_str(),
        server.query_url().as_str(),
    ))
    .expect("session");
    let mut events = session.subscribe_events();

    session
        .upload()
        .submit_file(Some(FileUpload::from_bytes("ledger.csv", b"x".to_vec())))
        .await;
    session.chat().submit_question("total?").await;

    assert_eq!(
        server.queries().await,
        vec![json!({"question": "total?", "fileKey": "srv-42"})]
    );
    assert_eq!(
        session.transcript().snapshot().await,
        vec![
            ChatMessage::bot("File \"ledger.csv\" uploaded."),
            ChatMessage::user("total?"),
            ChatMessage::bot("Total is 99"),
        ]
    );

    let mut appended = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let ClientEvent::MessageAppended(message) = event {
            appended.push(message);
        }
    }
    assert_eq!(appended, session.transcript().snapshot().await);
}

#[tokio::test]
async fn unreachable_upload_endpoint_is_reported_once_and_settles() {
    let dead = unreachable_base_url().await;
    let session = Session::from_settings(&live_settings(
        &format!("{dead}/upload"),
        &format!("{dead}/query"),
    ))
    .expect("session");

    let outcome = session
        .upload()
        .submit_file(Some(FileUpload::from_bytes("a.pdf", b"%PDF".to_vec())))
        .await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.upload().uploaded_file(), None);
    assert!(!session.upload().is_uploading());
    assert_eq!(session.upload().status(), UploadStatus::NoFile);
    let messages = session.transcript().snapshot().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert!(
        messages[0].text.starts_with("Upload error:"),
        "unexpected: {}",
        messages[0].text
    );
}

#[tokio::test]
async fn unreachable_query_endpoint_is_reported_once_and_settles() {
    let server = spawn_stub_server(
        (StatusCode::OK, json!({"key": "srv-1"})),
        (StatusCode::OK, json!({})),
    )
    .await;
    let dead = unreachable_base_url().await;
    let session = Session::from_settings(&live_settings(
        server.upload_url().as_str(),
        &format!("{dead}/query"),
    ))
    .expect("session");
    session
        .upload()
        .submit_file(Some(FileUpload::from_bytes("a.pdf", b"%PDF".to_vec())))
        .await;

    let outcome = session.chat().submit_question("total?").await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(!session.chat().is_awaiting_answer());
    let messages = session.transcript().snapshot().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1], ChatMessage::user("total?"));
    assert_eq!(messages[2].sender, Sender::Bot);
    assert!(
        messages[2].text.starts_with("Error:"),
        "unexpected: {}",
        messages[2].text
    );
}

#[test]
fn live_session_rejects_invalid_endpoints() {
    let result = Session::from_settings(&live_settings("::not-a-url::", "http://ok/query"));
    assert!(matches!(
        result,
        Err(SettingsError::InvalidEndpoint {
            name: "upload endpoint",
            ..
        })
    ));
}
