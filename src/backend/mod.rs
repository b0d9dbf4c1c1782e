pub mod http;

pub use http::{ApiError, HttpBackend};

#[cfg(test)]
use mockall::automock;

use crate::{
    config::BackendConfig,
    models::{QueryResult, Translation},
};
use async_trait::async_trait;
use eyre::{Result, bail};
use std::sync::Arc;

/// The three remote calls the store depends on.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Backend {
    fn name(&self) -> &str;

    /// Turns a natural-language question into SQL.
    async fn translate(&self, question: &str) -> Result<Translation>;

    /// Runs a statement. A statement that ran but failed is reported through
    /// `QueryResult::error`; `Err` means the call itself failed.
    async fn execute(&self, sql: &str) -> Result<QueryResult>;

    /// Tells the backend that `sql` was a good answer to `question`.
    async fn feedback(&self, sql: &str, question: &str) -> Result<()>;
}

pub type ArcBackend = Arc<dyn Backend + Send + Sync>;

pub fn new_backend(config: &BackendConfig) -> Result<ArcBackend> {
    if config.base_url.trim().is_empty() {
        bail!("backend base_url is not configured");
    }

    let backend: HttpBackend = config.into();
    log::debug!("Using backend {} at {}", backend.name(), backend.base_url());
    Ok(Arc::new(backend))
}

/// Text shown to the user for a failed backend call: the service's own message
/// when it sent one, the whole error chain otherwise.
pub fn error_message(err: &eyre::Report) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) => api.message.clone(),
        None => format!("{err:#}"),
    }
}
