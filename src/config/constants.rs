/// Max characters of the first question kept in a conversation title
pub const TITLE_MAX_CHARS: usize = 50;

/// Result rows printed under an answer
pub const TABLE_MAX_ROWS: usize = 20;

/// Rows shown in a chart window by default
pub const CHART_PAGE_SIZE: usize = 30;

pub const STORAGE_KEY: &str = "sql_conversations";

/// What the translate endpoint returns when it could not produce SQL
pub const FAILED_SQL_SENTINEL: &str = "/* Failed to generate SQL */";

pub const TRANSLATION_FAILED: &str = "Failed to generate SQL";

pub const UNKNOWN_ERROR: &str = "Unknown error";

pub const ERROR_COLUMN: &str = "Error";

pub const SUBMITTED_CONTENT: &str = "Here's the SQL query for your request:";

pub const EDITED_CONTENT: &str = "Here's the updated SQL query:";

pub const REGENERATED_CONTENT: &str = "Here's the regenerated SQL query:";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

pub const LOG_FILE_PATH: &str = "/tmp/sqlchat.log";
