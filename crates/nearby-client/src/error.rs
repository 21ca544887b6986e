use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("response from {url} is missing field `{field}`")]
    MissingField { url: String, field: &'static str },
}
