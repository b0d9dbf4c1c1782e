use crate::{
    chart::LabelFallback,
    config::{
        StorageConfig,
        constants::{
            CHART_PAGE_SIZE, DEFAULT_BASE_URL, LOG_FILE_PATH, TABLE_MAX_ROWS, TITLE_MAX_CHARS,
        },
    },
};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    assert_eq!(config.general.title_max_chars, 40);
    assert_eq!(config.general.table_max_rows, 10);
    assert_eq!(config.general.verbose, true);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("debug"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("sqlchat::backend"));
    assert_eq!(log_filters[0].level.as_deref(), Some("trace"));
    assert_eq!(log.file.path, "/var/log/sqlchat.log");
    assert_eq!(log.file.append, true);

    let backend = &config.backend;
    assert_eq!(backend.base_url, "https://nl2sql.internal/api/");
    assert_eq!(backend.api_key.as_deref(), Some("secret"));
    assert_eq!(backend.timeout(), Some(std::time::Duration::from_secs(45)));

    match &config.storage {
        StorageConfig::Sqlite(sqlite) => {
            assert_eq!(sqlite.path.as_deref(), Some("/var/lib/sqlchat/history.db"));
        }
        other => panic!("unexpected storage config: {:?}", other),
    }

    assert_eq!(config.chart.page_size, 20);
    assert_eq!(config.chart.label_fallback, LabelFallback::Random);
    assert_eq!(config.feedback.prompt_after_regenerate, false);
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    assert_eq!(config.general.title_max_chars, TITLE_MAX_CHARS);
    assert_eq!(config.general.table_max_rows, TABLE_MAX_ROWS);
    assert_eq!(config.log.level.as_deref(), Some("info"));
    assert_eq!(config.log.file.path, LOG_FILE_PATH);
    assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.backend.timeout_secs, Some(10));
    assert_eq!(config.chart.page_size, CHART_PAGE_SIZE);
    assert_eq!(config.chart.label_fallback, LabelFallback::RowIndex);
    assert_eq!(config.feedback.prompt_after_regenerate, true);

    match &config.storage {
        StorageConfig::File(file) => {
            assert_eq!(file.path, "${HOME}/.sqlchat/conversations.json");
        }
        other => panic!("unexpected storage config: {:?}", other),
    }
}

#[test]
fn test_load_configuration_missing_file() {
    let err = load_configuration("./testdata/missing.toml").unwrap_err();
    assert_eq!(err.to_string(), "reading ./testdata/missing.toml");
}

#[test]
fn test_resolve_path() {
    let ret = resolve_path("$SQLCHAT_TEST_PATH/${SQLCHAT_USER_PATH}/config.toml")
        .expect("failed to resolve path");
    assert_eq!(ret, "//config.toml");

    let dir = "/tmp/test";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("SQLCHAT_TEST_PATH", dir);
        std::env::set_var("SQLCHAT_USER_PATH", user_path);
    }
    let ret = resolve_path("$SQLCHAT_TEST_PATH/${SQLCHAT_USER_PATH}/config.toml")
        .expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/config.toml"));
}

#[test]
fn test_basename() {
    assert_eq!(basename("src/store/mod.rs"), "mod.rs");
    assert_eq!(basename("main.rs"), "main.rs");
}
