use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = AcquireError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AcquireError {
    /// Transport failure: DNS, refused, reset, or a broken body stream.
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not JSON, or not the JSON shape we read from it.
    #[error("could not parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("chapter {0} not found in chapter listing")]
    ChapterNotFound(u32),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
