//! UI/backend events and error modeling for desktop GUI controller.

use client_core::ClientEvent;

pub enum UiEvent {
    Info(String),
    SessionReady { mock: bool },
    Client(ClientEvent),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("endpoint")
            || message_lower.contains("settings")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("disconnected")
            || message_lower.contains("queue")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn label(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Configuration => "Configuration",
            UiErrorCategory::Transport => "Transport",
            UiErrorCategory::Unknown => "Unexpected",
        }
    }
}
