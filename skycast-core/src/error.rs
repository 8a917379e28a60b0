use thiserror::Error;

/// Failure taxonomy for a single request against the weather API.
///
/// Every fetch resolves to exactly one of these. Callers branch with a
/// `match` instead of inspecting error strings; no variant is retried
/// automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, TLS, timeout, or a broken
    /// body stream. The server was never reached or stopped answering.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("server returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Status code of an [`ApiError::Http`], if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
