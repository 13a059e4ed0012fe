use thiserror::Error;

/// Everything that can abort a run. All variants are fatal; nothing is
/// caught or retried internally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid date format: {0}. Expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("query expression has no children")]
    InvalidExpression,

    #[error("arXiv responded with status {0}")]
    ExternalFetchFailed(u16),

    #[error("invalid link format: {0}. Expected https://arxiv.org/abs/<id>")]
    InvalidLinkFormat(String),

    #[error("malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("failed to reach arXiv: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse arXiv feed: {0}")]
    Feed(#[from] quick_xml::DeError),

    #[error("failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
