use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{load_settings, SettingsOverrides};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::FileChatApp;

#[derive(Parser, Debug)]
#[command(name = "desktop_gui", about = "Upload a file and chat about it")]
struct Args {
    /// Settings file; defaults to ./client.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    upload_url: Option<String>,
    #[arg(long)]
    query_url: Option<String>,
    /// Use the in-process mock backends.
    #[arg(long, conflicts_with = "live")]
    mock: bool,
    /// Talk to the configured HTTP endpoints.
    #[arg(long)]
    live: bool,
    #[arg(long)]
    mock_delay_ms: Option<u64>,
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
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    args.overrides().apply(&mut settings);
    tracing::info!(mock = settings.use_mock, "starting desktop gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("File Upload + Chat")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([520.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "File Upload + Chat",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(FileChatApp::new(cmd_tx, ui_rx)))
        }),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
