use crate::model::{Location, SourceId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown source: {0}")]
    UnknownSource(SourceId),
    #[error("no breakpoint at {0}")]
    UnknownBreakpoint(Location),
    #[error("{0}")]
    Command(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, Error>;
