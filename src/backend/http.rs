#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use crate::backend::{ArcBackend, Backend};
use crate::config::{BackendConfig, constants::UNKNOWN_ERROR, user_agent};
use crate::models::{QueryResult, Translation};
use async_trait::async_trait;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time;
use thiserror::Error;

const TRANSLATE_PATH: &str = "translate";
const EXECUTE_PATH: &str = "execute/sql";
const FEEDBACK_PATH: &str = "translate/feedback";

/// Gateway to the text-to-SQL service over JSON/HTTP.
pub struct HttpBackend {
    base_url: String,
    api_key: Option<String>,
    timeout: Option<time::Duration>,
    client: reqwest::Client,
}

#[async_trait]
impl Backend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn translate(&self, question: &str) -> Result<Translation> {
        let res = self
            .post(TRANSLATE_PATH, &TranslateRequest { question })
            .await
            .wrap_err("sending translate request")?;

        let translation = res
            .json::<Translation>()
            .await
            .wrap_err("parsing translate response")?;
        log::trace!("Translated {:?} into {:?}", question, translation.sql);
        Ok(translation)
    }

    async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let res = self
            .post(EXECUTE_PATH, &ExecuteRequest { sql })
            .await
            .wrap_err("sending execute request")?;

        let res = res
            .json::<ExecuteResponse>()
            .await
            .wrap_err("parsing execute response")?;
        Ok(res.into())
    }

    async fn feedback(&self, sql: &str, question: &str) -> Result<()> {
        let res = self
            .post(FEEDBACK_PATH, &FeedbackRequest { sql, question })
            .await
            .wrap_err("sending feedback request")?;

        let body = res.text().await.unwrap_or_default();
        log::debug!("Feedback acknowledged: {}", body);
        Ok(())
    }
}

impl From<HttpBackend> for ArcBackend {
    fn from(value: HttpBackend) -> Self {
        Arc::new(value)
    }
}

impl From<&BackendConfig> for HttpBackend {
    fn from(value: &BackendConfig) -> Self {
        let mut backend = HttpBackend::default().with_base_url(&value.base_url);

        if let Some(api_key) = value.api_key.as_deref() {
            backend = backend.with_api_key(api_key);
        }

        if let Some(timeout) = value.timeout() {
            backend = backend.with_timeout(timeout);
        }
        backend
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout: None,
            client: reqwest::Client::new(),
        }
    }
}

impl HttpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoints are appended to the base URL, so it always ends with `/`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Option<time::Duration> {
        self.timeout
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        let mut req = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json")
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        if let Some(token) = &self.api_key {
            req = req.bearer_auth(token);
        }

        let res = req.json(body).send().await?;

        if !res.status().is_success() {
            let http_code = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            log::error!("Error response from {}: {} {}", path, http_code, body);
            return Err(ApiError::from_body(http_code, &body).into());
        }
        Ok(res)
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    sql: &'a str,
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    sql: &'a str,
    question: &'a str,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    columns: Vec<String>,
    /// Rows keyed by column name
    #[serde(default)]
    data: Option<Vec<Map<String, Value>>>,
    /// Positional rows
    #[serde(default)]
    rows: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    error: Option<String>,
}

impl From<ExecuteResponse> for QueryResult {
    fn from(value: ExecuteResponse) -> Self {
        let result = match (value.data, value.rows) {
            (Some(data), _) => QueryResult::from_records(value.columns, data),
            (None, Some(rows)) => QueryResult::new(value.columns, rows),
            (None, None) => QueryResult::new(value.columns, vec![]),
        };

        match value.error {
            Some(error) => result.with_error(error),
            None => result,
        }
    }
}

#[derive(Default, Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<Value>,
}

/// An error reported by the service itself. Displays the service's message
/// verbatim so it can be shown to the user as is.
#[derive(Default, Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub http_code: u16,
    pub message: String,
}

impl ApiError {
    fn from_body(http_code: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).unwrap_or_default();
        let message = parsed
            .error
            .or_else(|| {
                parsed.detail.map(|d| match d {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            })
            .filter(|m| !m.trim().is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

        Self { http_code, message }
    }
}
