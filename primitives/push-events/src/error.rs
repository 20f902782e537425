use thiserror::Error;

/// Failure while reading the event feed. None of these are retried.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to reach the events API")]
    Transport(#[from] reqwest::Error),

    #[error("events API returned {status} for page {page}")]
    Status {
        page: u32,
        status: reqwest::StatusCode,
    },

    #[error("malformed events response on page {page}")]
    Decode {
        page: u32,
        #[source]
        source: serde_json::Error,
    },

    #[error("event {event_id} has an invalid created_at timestamp: {value}")]
    Timestamp {
        event_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
