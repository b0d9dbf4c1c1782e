#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;

pub(crate) mod migration;

use async_trait::async_trait;
use eyre::{Context, Result};
use tokio_rusqlite::{Connection, OpenFlags, named_params, params};

use crate::{config::constants::STORAGE_KEY, models::Conversation, storage::Storage};

use super::{decode_conversations, encode_conversations};
use migration::MIGRATION;

/// Key/value table holding the serialized conversation list under one key.
pub struct Sqlite {
    conn: Connection,
}

impl Sqlite {
    pub async fn new(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(path) => {
                if let Some(dir) = std::path::Path::new(path).parent() {
                    std::fs::create_dir_all(dir)
                        .wrap_err(format!("creating directory {}", dir.display()))?;
                }
                Connection::open_with_flags(
                    path,
                    OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
                )
                .await
                .wrap_err(format!("opening database path: {}", path))?
            }
            None => Connection::open_in_memory()
                .await
                .wrap_err("opening in-memory database")?,
        };

        let ret = Self { conn };
        ret.run_migration().await.wrap_err("running migration")?;
        Ok(ret)
    }

    async fn run_migration(&self) -> Result<()> {
        self.conn
            .call(|conn| Ok::<_, tokio_rusqlite::Error>(conn.execute_batch(MIGRATION)?))
            .await
            .wrap_err("executing migration")?;
        Ok(())
    }

    pub(crate) async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        let value = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?")?;
                let mut rows = stmt.query(params![key])?;
                let value: Option<String> = match rows.next()? {
                    Some(row) => Some(row.get(0)?),
                    None => None,
                };
                Ok::<_, tokio_rusqlite::Error>(value)
            })
            .await
            .wrap_err("reading key")?;
        Ok(value)
    }

    pub(crate) async fn set_raw(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    r#"INSERT INTO kv_store (key, value, updated_at)
                VALUES (:key, :value, :updated_at)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                    named_params! {
                        ":key": key,
                        ":value": value,
                        ":updated_at": chrono::Utc::now().timestamp_millis(),
                    },
                )?;
                Ok::<_, tokio_rusqlite::Error>(tx.commit()?)
            })
            .await
            .wrap_err("writing key")?;
        Ok(())
    }
}

#[async_trait]
impl Storage for Sqlite {
    async fn load_conversations(&self) -> Result<Vec<Conversation>> {
        let raw = self
            .get_raw(STORAGE_KEY)
            .await
            .wrap_err("loading conversations")?;
        Ok(raw.map(|raw| decode_conversations(&raw)).unwrap_or_default())
    }

    async fn save_conversations(&self, conversations: &[Conversation]) -> Result<()> {
        let raw = encode_conversations(conversations)?;
        self.set_raw(STORAGE_KEY, raw)
            .await
            .wrap_err("saving conversations")?;
        log::trace!("Saved {} conversations", conversations.len());
        Ok(())
    }
}
