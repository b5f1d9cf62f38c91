use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatErr>;

#[derive(Error, Debug)]
pub enum ChatErr {
    /// The backend refused the request outright (non-success status).
    #[error("unexpected status {0}: {1}")]
    UnexpectedStatus(StatusCode, String),

    /// The response body was unreadable, stalled, or ended mid-frame in a
    /// way the decoder could not recover from.
    #[error("stream error: {0}")]
    Stream(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}
