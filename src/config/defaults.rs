use super::constants::*;

pub(crate) fn title_max_chars() -> usize {
    TITLE_MAX_CHARS
}

pub(crate) fn table_max_rows() -> usize {
    TABLE_MAX_ROWS
}

pub(crate) fn page_size() -> usize {
    CHART_PAGE_SIZE
}

pub(crate) fn base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
