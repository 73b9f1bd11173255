//! UI layer: the upload area shell and the floating chat widget.

pub mod app;
pub mod chat_widget;

pub use app::FileChatApp;
