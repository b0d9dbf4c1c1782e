use thiserror::Error;

use crate::chart::ChartRangeError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The backend could not turn the question into SQL.
    #[error("{0}")]
    Translation(String),

    /// The statement ran but failed.
    #[error("{0}")]
    Execution(String),

    #[error("persistence failed: {0}")]
    Persistence(String),

    #[error(transparent)]
    ChartRange(#[from] ChartRangeError),

    #[error("feedback failed: {0}")]
    Feedback(String),

    #[error("question must not be empty")]
    EmptyQuestion,
}

impl Error {
    pub fn persistence(err: &eyre::Report) -> Self {
        Error::Persistence(format!("{err:#}"))
    }
}
