pub mod conversation;
pub mod event;
pub mod message;
pub mod query;

pub use conversation::Conversation;
pub use event::{ArcEventTx, EventTx, StoreEvent};
pub use message::{Feedback, Message, MessageStatus, Role};
pub use query::{QueryResult, Translation};
