use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, ClientEvent, FileUpload, IgnoreReason, Session, SettingsOverrides,
    SubmitOutcome,
};
use shared::domain::{ChatMessage, Sender};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "filechat", about = "Upload a file and ask questions about it")]
struct Args {
    /// Settings file; defaults to ./client.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    upload_url: Option<String>,
    #[arg(long)]
    query_url: Option<String>,
    #[arg(long, conflicts_with = "live")]
    mock: bool,
    #[arg(long)]
    live: bool,
    #[arg(long)]
    mock_delay_ms: Option<u64>,
    /// Upload this file, then exit unless `--ask` is also given.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Ask one question, then exit.
    #[arg(long)]
    ask: Option<String>,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        let use_mock = match (self.mock, self.live) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        SettingsOverrides {
            upload_url: self.upload_url.clone(),
            query_url: self.query_url.clone(),
            use_mock,
            mock_delay_ms: self.mock_delay_ms,
        }
    }

    fn is_one_shot(&self) -> bool {
        self.file.is_some() || self.ask.is_some()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Upload(Option<PathBuf>),
    Clear,
    Status,
    Quit,
    Ask(String),
    Unknown(String),
    Empty,
}

fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return ReplCommand::Ask(line.to_string());
    };
    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    match name {
        "upload" => ReplCommand::Upload((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "clear" => ReplCommand::Clear,
        "status" => ReplCommand::Status,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

fn format_message(message: &ChatMessage) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Bot => "Bot",
    };
    format!("{who}: {}", message.text)
}

async fn print_events(mut events: broadcast::Receiver<ClientEvent>) {
    loop {
        match events.recv().await {
            Ok(ClientEvent::MessageAppended(message)) => println!("{}", format_message(&message)),
            Ok(ClientEvent::TranscriptCleared) => println!("(transcript cleared)"),
            Ok(ClientEvent::UploadStarted) => println!("Status: Uploading..."),
            Ok(other) => tracing::debug!(?other, "session event"),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer lagged behind session events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn report_ignored(outcome: SubmitOutcome) {
    if let SubmitOutcome::Ignored(reason) = outcome {
        match reason {
            IgnoreReason::NoFileSelected => eprintln!("usage: :upload <path>"),
            IgnoreReason::InFlight => eprintln!("still busy; try again when it finishes"),
            IgnoreReason::EmptyQuestion | IgnoreReason::UploadRequired => {
                tracing::debug!(?reason, "submission ignored");
            }
        }
    }
}

async fn print_status(session: &Session, mock: bool) {
    let status = session.upload().status();
    match session.upload().uploaded_file() {
        Some(file) => println!("Status: {} (key {})", status.label(), file.key),
        None => println!("Status: {}", status.label()),
    }
    println!(
        "Backend: {} | messages: {}",
        if mock { "mock" } else { "http" },
        session.transcript().len().await
    );
}

async fn run_one_shot(session: &Session, args: &Args) {
    if let Some(path) = &args.file {
        let outcome = session
            .upload()
            .submit_file(Some(FileUpload::from_path(path.clone())))
            .await;
        report_ignored(outcome);
    }
    if let Some(question) = &args.ask {
        let outcome = session.chat().submit_question(question).await;
        report_ignored(outcome);
    }
}

async fn run_repl(session: &Session, mock: bool) -> Result<()> {
    println!("Commands: :upload <path>, :clear, :status, :quit. Anything else is a question.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Clear => session.chat().clear_transcript().await,
            ReplCommand::Status => print_status(session, mock).await,
            ReplCommand::Upload(path) => {
                let outcome = session
                    .upload()
                    .submit_file(path.map(FileUpload::from_path))
                    .await;
                report_ignored(outcome);
            }
            ReplCommand::Ask(question) => {
                let outcome = session.chat().submit_question(&question).await;
                report_ignored(outcome);
            }
            ReplCommand::Unknown(name) => eprintln!("unknown command ':{name}'"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    args.overrides().apply(&mut settings);

    let session = Session::from_settings(&settings).context("failed to start session")?;
    let printer = tokio::spawn(print_events(session.subscribe_events()));

    if args.is_one_shot() {
        run_one_shot(&session, &args).await;
    } else {
        run_repl(&session, settings.use_mock).await?;
    }

    // Dropping the session closes the event stream so the printer drains and exits.
    drop(session);
    printer.await.context("event printer task failed")?;
    Ok(())
}
