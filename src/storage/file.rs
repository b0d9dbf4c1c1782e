#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path::PathBuf;

use async_trait::async_trait;
use eyre::{Context, Result};

use crate::{models::Conversation, storage::Storage};

use super::{decode_conversations, encode_conversations};

/// Keeps the conversation list in a single JSON file.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl Storage for JsonFile {
    async fn load_conversations(&self) -> Result<Vec<Conversation>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => {
                return Err(err).wrap_err(format!("reading {}", self.path.display()));
            }
        };
        Ok(decode_conversations(&raw))
    }

    async fn save_conversations(&self, conversations: &[Conversation]) -> Result<()> {
        let raw = encode_conversations(conversations)?;
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .wrap_err(format!("creating directory {}", dir.display()))?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw)
            .await
            .wrap_err(format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .wrap_err(format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
