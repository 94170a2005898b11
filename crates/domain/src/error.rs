/// Shared error type used across all PawTalk crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// A non-2xx response from the care service.  The message is derived
    /// from the payload's `detail`/`message` field when present.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("no dog selected")]
    NoDogSelected,

    #[error("message is empty")]
    EmptyMessage,

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
