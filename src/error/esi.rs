use thiserror::Error;

/// Failures talking to ESI.
///
/// Statuses are kept as plain `u16` so callers (and tests) can construct and match them
/// without a live HTTP response.
#[derive(Error, Debug)]
pub enum EsiError {
    /// The request never produced a response (connection refused, reset, timeout).
    #[error("ESI request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// ESI answered with a status the caller does not treat as a normal outcome.
    #[error("ESI returned status {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body did not match the expected schema.
    #[error("Failed to decode ESI response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// No bearer token has been registered for an owner-scoped endpoint.
    #[error("No ESI access token registered for owner ID {0}")]
    MissingAccessToken(i64),
}

impl EsiError {
    /// HTTP status attached to the error, if ESI answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
