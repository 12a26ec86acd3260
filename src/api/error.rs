use std::error::Error as StdError;
use std::fmt;

/// Failures talking to the backend.
///
/// The UI collapses every variant into one notice; the distinction exists for
/// logs and tests.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, ...).
    Transport(reqwest::Error),
    /// The backend answered with a non-success HTTP status.
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The response body was not the JSON shape we expected.
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
    /// The backend answered with `success: false`.
    Rejected { message: Option<String> },
}

impl ApiError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "Request failed: {err}"),
            ApiError::Status { status, body } => {
                let body = body.split_whitespace().collect::<Vec<_>>().join(" ");
                if body.is_empty() {
                    write!(f, "Backend responded with status {status}")
                } else {
                    write!(f, "Backend responded with status {status}: {body}")
                }
            }
            ApiError::Decode { endpoint, source } => {
                write!(f, "Unexpected response from {endpoint}: {source}")
            }
            ApiError::Rejected { message } => match message {
                Some(message) => write!(f, "Request rejected: {message}"),
                None => write!(f, "Request rejected"),
            },
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Transport(err) => Some(err),
            ApiError::Decode { source, .. } => Some(source),
            ApiError::Status { .. } | ApiError::Rejected { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}
