pub mod app;
pub mod backend;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
