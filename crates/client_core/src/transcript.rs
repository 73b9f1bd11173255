use std::sync::Arc;

use shared::domain::ChatMessage;
use tokio::sync::{broadcast, RwLock};

use crate::ClientEvent;

/// Ordered conversation shared by both controllers. Append-only apart from `clear`.
#[derive(Clone)]
pub struct Transcript {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    events: broadcast::Sender<ClientEvent>,
}

impl Transcript {
    pub fn new(events: broadcast::Sender<ClientEvent>) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    pub async fn push(&self, message: ChatMessage) {
        let mut guard = self.messages.write().await;
        guard.push(message.clone());
        // Sent under the lock so subscribers observe storage order.
        let _ = self.events.send(ClientEvent::MessageAppended(message));
    }

    pub async fn push_bot(&self, text: impl Into<String>) {
        self.push(ChatMessage::bot(text)).await;
    }

    pub async fn clear(&self) {
        let mut guard = self.messages.write().await;
        guard.clear();
        let _ = self.events.send(ClientEvent::TranscriptCleared);
    }

    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}
