pub mod file;
pub mod sqlite;

use std::sync::Arc;

use crate::{
    config::{StorageConfig, resolve_path},
    models::Conversation,
};
use async_trait::async_trait;
use eyre::{Context, Result};
use file::JsonFile;
use sqlite::Sqlite;

/// Durable home of the conversation list. The whole list is written and read
/// as one value; there are no partial updates.
#[async_trait]
pub trait Storage {
    /// Missing or corrupt data yields an empty list. `Err` is reserved for a
    /// storage that could not be read at all.
    async fn load_conversations(&self) -> Result<Vec<Conversation>>;
    async fn save_conversations(&self, conversations: &[Conversation]) -> Result<()>;
}

pub type ArcStorage = Arc<dyn Storage + Send + Sync>;

pub async fn new_storage(config: &StorageConfig) -> Result<ArcStorage> {
    let storage: ArcStorage = match config {
        StorageConfig::Sqlite(sqlite_config) => {
            let path = match sqlite_config.path.as_deref() {
                Some(path) => Some(resolve_path(path).wrap_err("resolving sqlite path")?),
                None => None,
            };
            Arc::new(Sqlite::new(path.as_deref()).await?)
        }
        StorageConfig::File(file_config) => {
            let path = resolve_path(&file_config.path).wrap_err("resolving storage file path")?;
            Arc::new(JsonFile::new(path))
        }
    };
    Ok(storage)
}

pub(crate) fn encode_conversations(conversations: &[Conversation]) -> Result<String> {
    serde_json::to_string(conversations).wrap_err("encoding conversations")
}

/// Parses a stored conversation list, falling back to an empty list when the
/// payload is corrupt.
pub(crate) fn decode_conversations(raw: &str) -> Vec<Conversation> {
    if raw.trim().is_empty() {
        return vec![];
    }

    match serde_json::from_str::<Vec<Conversation>>(raw) {
        Ok(conversations) => conversations,
        Err(err) => {
            log::error!("Failed to load conversations, starting empty: {}", err);
            vec![]
        }
    }
}
