use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::ViewState;
use crate::ui::chat_widget::{show_chat_widget, ChatAction, ACCENT};

pub struct FileChatApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: ViewState,
}

impl FileChatApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: ViewState {
                status: "Starting...".to_string(),
                ..ViewState::default()
            },
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.view.apply(event);
        }
    }

    fn queue(&mut self, cmd: BackendCommand) {
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.view.apply(UiEvent::Error(err));
        }
    }

    fn pick_and_upload(&mut self) {
        let path = rfd::FileDialog::new().pick_file();
        self.view.picked_file = path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        self.queue(BackendCommand::UploadFile { path });
    }

    fn ask(&mut self) {
        // Blank input never leaves the UI; the controller would ignore it anyway.
        if let Some(text) = self.view.pending_question() {
            self.queue(BackendCommand::AskQuestion { text });
        }
    }

    fn show_upload_area(&mut self, ctx: &egui::Context) {
        let mut choose_clicked = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.heading("Upload File");
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    let choose =
                        ui.add_enabled(!self.view.uploading, egui::Button::new("Choose file…"));
                    if choose.clicked() {
                        choose_clicked = true;
                    }
                    match &self.view.picked_file {
                        Some(name) => ui.label(name),
                        None => ui.weak("No file chosen"),
                    };
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label("Status:");
                    ui.label(egui::RichText::new(self.view.upload_status().label()).strong());
                    if self.view.uploading {
                        ui.spinner();
                    }
                });

                if let Some(file) = &self.view.uploaded_file {
                    ui.add_space(4.0);
                    ui.small(format!("Key: {}", file.key));
                }
            });

            if let Some(banner) = self.view.banner.clone() {
                ui.add_space(16.0);
                egui::Frame::new()
                    .fill(ui.visuals().error_fg_color.gamma_multiply(0.12))
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::symmetric(10, 6))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(ui.visuals().error_fg_color, banner);
                            if ui.small_button("Dismiss").clicked() {
                                self.view.banner = None;
                            }
                        });
                    });
            }
        });

        if choose_clicked {
            self.pick_and_upload();
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(&self.view.status);
                if self.view.mock_mode == Some(true) {
                    ui.small(egui::RichText::new("mock").color(ACCENT));
                }
            });
        });
    }

    fn is_busy(&self) -> bool {
        self.view.uploading || self.view.awaiting_answer
    }
}

impl eframe::App for FileChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_status_bar(ctx);
        self.show_upload_area(ctx);

        match show_chat_widget(ctx, &mut self.view) {
            Some(ChatAction::Ask) => self.ask(),
            Some(ChatAction::Clear) => self.queue(BackendCommand::ClearTranscript),
            None => {}
        }

        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
