//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(UiError::from_message(
            UiErrorContext::CommandQueue,
            "UI command queue is full; please retry",
        )),
        Err(TrySendError::Disconnected(_)) => Err(UiError::from_message(
            UiErrorContext::CommandQueue,
            "Backend command processor disconnected (possible startup/runtime failure); restart the app",
        )),
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::controller::events::UiErrorCategory;

    #[test]
    fn queues_commands_while_capacity_remains() {
        let (cmd_tx, cmd_rx) = bounded(1);

        dispatch_backend_command(&cmd_tx, BackendCommand::ClearTranscript).expect("queued");

        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::ClearTranscript)
        ));
    }

    #[test]
    fn full_queue_is_reported_as_transport_error() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        dispatch_backend_command(&cmd_tx, BackendCommand::ClearTranscript).expect("queued");

        let err = dispatch_backend_command(
            &cmd_tx,
            BackendCommand::AskQuestion {
                text: "total?".to_string(),
            },
        )
        .expect_err("queue full");

        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::CommandQueue);
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(4);
        drop(cmd_rx);

        let err = dispatch_backend_command(&cmd_tx, BackendCommand::UploadFile { path: None })
            .expect_err("disconnected");

        assert!(err.message().contains("disconnected"));
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }
}
