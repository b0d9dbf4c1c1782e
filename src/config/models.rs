use std::time;

use serde::{Deserialize, Serialize};

use crate::chart::LabelFallback;

use super::constants::{CHART_PAGE_SIZE, LOG_FILE_PATH, TABLE_MAX_ROWS, TITLE_MAX_CHARS};
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub feedback: FeedbackConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default = "title_max_chars")]
    pub title_max_chars: usize,

    #[serde(default = "table_max_rows")]
    pub table_max_rows: usize,

    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BackendConfig {
    /// Prefix of every endpoint, e.g. `https://api.example.com/v1/`
    #[serde(default = "base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u16>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum StorageConfig {
    #[serde(rename = "sqlite")]
    Sqlite(SqliteStorage),
    #[serde(rename = "file")]
    File(FileStorage),
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SqliteStorage {
    pub path: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FileStorage {
    pub path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ChartConfig {
    #[serde(default = "page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub label_fallback: LabelFallback,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FeedbackConfig {
    /// Offer the feedback prompt again once a message has been regenerated
    #[serde(default = "default_true")]
    pub prompt_after_regenerate: bool,
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout_secs
            .map(|secs| time::Duration::from_secs(secs as u64))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title_max_chars: TITLE_MAX_CHARS,
            table_max_rows: TABLE_MAX_ROWS,
            verbose: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: base_url(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Sqlite(SqliteStorage::default())
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            page_size: CHART_PAGE_SIZE,
            label_fallback: LabelFallback::default(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            prompt_after_regenerate: true,
        }
    }
}
