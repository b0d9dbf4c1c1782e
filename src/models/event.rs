use std::sync::Arc;

use tokio::sync::mpsc;

/// Notifications emitted by the store after each state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ConversationsLoaded(usize),
    CurrentConversationChanged(Option<String>),
    ConversationUpdated(String),
    ConversationDeleted(String),
    MessageUpdated {
        conversation_id: String,
        message_id: String,
    },
    LoadingChanged(bool),
    ChartStateChanged,
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: StoreEvent) -> Result<(), mpsc::error::SendError<StoreEvent>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<StoreEvent> {
    async fn send(&self, event: StoreEvent) -> Result<(), mpsc::error::SendError<StoreEvent>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<StoreEvent> {
    async fn send(&self, event: StoreEvent) -> Result<(), mpsc::error::SendError<StoreEvent>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
