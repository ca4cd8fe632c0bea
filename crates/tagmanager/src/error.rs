use thiserror::Error;

pub type Result<T> = std::result::Result<T, TagManagerError>;

#[derive(Error, Debug)]
pub enum TagManagerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Tag Manager API returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}
