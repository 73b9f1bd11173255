//! Floating chat widget: a launcher button when closed, a fixed panel when open.

use eframe::egui;
use shared::domain::ChatMessage;

use crate::controller::reducer::ViewState;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(11, 118, 239);
const BOT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(243, 244, 246);
const BOT_TEXT: egui::Color32 = egui::Color32::from_rgb(17, 17, 17);
const PANEL_WIDTH: f32 = 380.0;
const TRANSCRIPT_HEIGHT: f32 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAction {
    Ask,
    Clear,
}

pub fn show_chat_widget(ctx: &egui::Context, view: &mut ViewState) -> Option<ChatAction> {
    if view.chat_open {
        show_panel(ctx, view)
    } else {
        show_launcher(ctx, view);
        None
    }
}

fn show_launcher(ctx: &egui::Context, view: &mut ViewState) {
    egui::Area::new(egui::Id::new("chat_widget_launcher"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-24.0, -24.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let button = egui::Button::new(
                egui::RichText::new("💬")
                    .size(28.0)
                    .color(egui::Color32::WHITE),
            )
            .fill(ACCENT)
            .corner_radius(egui::CornerRadius::same(32))
            .min_size(egui::vec2(64.0, 64.0));
            if ui.add(button).on_hover_text("Open chat").clicked() {
                view.toggle_chat();
            }
        });
}

fn show_panel(ctx: &egui::Context, view: &mut ViewState) -> Option<ChatAction> {
    let mut action = None;

    egui::Area::new(egui::Id::new("chat_widget_panel"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-20.0, -20.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::WHITE)
                .corner_radius(12.0)
                .shadow(ui.visuals().popup_shadow)
                .show(ui, |ui| {
                    ui.set_width(PANEL_WIDTH);
                    show_header(ui, view);

                    egui::Frame::new()
                        .inner_margin(egui::Margin::same(12))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new("Chat about file").strong().size(15.0));
                            ui.add_space(6.0);
                            show_transcript(ui, view);
                            ui.add_space(12.0);
                            action = show_composer(ui, view);
                        });
                });
        });

    action
}

fn show_header(ui: &mut egui::Ui, view: &mut ViewState) {
    egui::Frame::new()
        .fill(ACCENT)
        .corner_radius(egui::CornerRadius {
            nw: 12,
            ne: 12,
            sw: 0,
            se: 0,
        })
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Chatbot")
                        .strong()
                        .size(16.0)
                        .color(egui::Color32::WHITE),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let close = egui::Button::new(
                        egui::RichText::new("✖").size(18.0).color(egui::Color32::WHITE),
                    )
                    .frame(false);
                    if ui.add(close).on_hover_text("Close chat").clicked() {
                        view.toggle_chat();
                    }
                });
            });
        });
}

fn show_transcript(ui: &mut egui::Ui, view: &ViewState) {
    egui::Frame::new()
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(221)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("chat_widget_transcript")
                .max_height(TRANSCRIPT_HEIGHT)
                .min_scrolled_height(TRANSCRIPT_HEIGHT)
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in &view.messages {
                        show_message(ui, message);
                    }
                    if view.awaiting_answer {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.weak("Thinking...");
                        });
                    }
                });
        });
}

fn show_message(ui: &mut egui::Ui, message: &ChatMessage) {
    let is_user = message.is_user();
    let (layout, who, who_color, fill, text_color) = if is_user {
        (
            egui::Layout::right_to_left(egui::Align::Min),
            "You",
            egui::Color32::from_gray(51),
            ACCENT,
            egui::Color32::WHITE,
        )
    } else {
        (
            egui::Layout::left_to_right(egui::Align::Min),
            "Bot",
            ACCENT,
            BOT_BUBBLE,
            BOT_TEXT,
        )
    };
    let max_bubble_width = ui.available_width() * 0.72;

    ui.with_layout(layout, |ui| {
        ui.add_sized(
            [36.0, 18.0],
            egui::Label::new(egui::RichText::new(who).strong().color(who_color)),
        );
        egui::Frame::new()
            .fill(fill)
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                ui.set_max_width(max_bubble_width);
                ui.add(egui::Label::new(egui::RichText::new(&message.text).color(text_color)).wrap());
            });
    });
    ui.add_space(8.0);
}

fn show_composer(ui: &mut egui::Ui, view: &mut ViewState) -> Option<ChatAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        let input_width = (ui.available_width() - 110.0).max(120.0);
        let response = ui.add(
            egui::TextEdit::singleline(&mut view.composer)
                .id_salt("chat_widget_composer")
                .hint_text("Ask something...")
                .desired_width(input_width),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            if view.can_ask() {
                action = Some(ChatAction::Ask);
            }
            response.request_focus();
        }

        let ask = ui.add_enabled(view.can_ask(), egui::Button::new("Ask"));
        if ask.clicked() {
            action = Some(ChatAction::Ask);
        }
        if ui
            .add_enabled(!view.messages.is_empty(), egui::Button::new("Clear"))
            .clicked()
        {
            action = Some(ChatAction::Clear);
        }
    });
    action
}
