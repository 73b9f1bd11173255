//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{ClientSettings, FileUpload, Session};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let session = match Session::from_settings(&settings) {
                Ok(session) => session,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("failed to build session: {err}");
                    return;
                }
            };

            let mut events = session.subscribe_events();
            let events_tx = ui_tx.clone();
            tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) => {
                            let _ = events_tx.try_send(UiEvent::Client(event));
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "ui event forwarder lagged behind session events");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::SessionReady {
                mock: settings.use_mock,
            });

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend: received command");
                match cmd {
                    BackendCommand::UploadFile { path } => {
                        let upload = session.upload().clone();
                        tokio::spawn(async move {
                            upload.submit_file(path.map(FileUpload::from_path)).await;
                        });
                    }
                    BackendCommand::AskQuestion { text } => {
                        let chat = session.chat().clone();
                        tokio::spawn(async move {
                            chat.submit_question(&text).await;
                        });
                    }
                    BackendCommand::ClearTranscript => {
                        session.chat().clear_transcript().await;
                    }
                }
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    });
}
