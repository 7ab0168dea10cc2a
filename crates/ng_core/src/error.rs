use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out for {0}")]
    Timeout(String),

    #[error("Connection failed for {0}")]
    Connection(String),

    #[error("HTTP status {code} for {url}")]
    HttpStatus { code: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Extraction incomplete: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
