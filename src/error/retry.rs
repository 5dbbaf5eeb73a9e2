use sea_orm::DbErr;

use super::{esi::EsiError, Error};

/// Strategy for handling errors in a retry context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (network & server errors)
    Retry,
    /// Failed permanently (bad request, undecodable data)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::EsiError(esi_error) => match esi_error {
                // Connection refused, reset or timed out before ESI answered
                EsiError::Request { source, .. } => {
                    if source.is_decode() {
                        ErrorRetryStrategy::Fail
                    } else {
                        ErrorRetryStrategy::Retry
                    }
                }

                EsiError::Status { status, .. } => match *status {
                    // 500 - Internal Server Error
                    //
                    // ESI is temporarily unavailable, backoff and retry
                    s if s >= 500 => ErrorRetryStrategy::Retry,

                    // 420 - Error limited, 429 - Rate limited
                    420 | 429 => ErrorRetryStrategy::Retry,

                    // 400 - Client Error
                    // We're making invalid requests or lack access, retrying won't help
                    _ => ErrorRetryStrategy::Fail,
                },

                // The response arrived but does not match the schema, a retry returns the same body
                EsiError::Decode { .. } => ErrorRetryStrategy::Fail,

                // Authentication is the caller's responsibility
                EsiError::MissingAccessToken(_) => ErrorRetryStrategy::Fail,
            },

            Self::DbErr(db_err) => match db_err {
                // Connection errors - transient, should retry
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,
                _ => ErrorRetryStrategy::Fail,
            },

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::InvalidInput(_) => ErrorRetryStrategy::Fail,
            Self::SnapshotEncodeError(_) => ErrorRetryStrategy::Fail,
            Self::IoError(_) => ErrorRetryStrategy::Fail,
            Self::SchedulerError(_) => ErrorRetryStrategy::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> Error {
        Error::EsiError(EsiError::Status {
            endpoint: "/characters/1/assets/".to_string(),
            status,
            body: String::new(),
        })
    }

    #[test]
    fn retries_server_errors() {
        assert_eq!(status_error(500).to_retry_strategy(), ErrorRetryStrategy::Retry);
        assert_eq!(status_error(503).to_retry_strategy(), ErrorRetryStrategy::Retry);
        assert_eq!(status_error(504).to_retry_strategy(), ErrorRetryStrategy::Retry);
    }

    #[test]
    fn retries_rate_limits() {
        assert_eq!(status_error(420).to_retry_strategy(), ErrorRetryStrategy::Retry);
        assert_eq!(status_error(429).to_retry_strategy(), ErrorRetryStrategy::Retry);
    }

    #[test]
    fn fails_client_errors() {
        assert_eq!(status_error(400).to_retry_strategy(), ErrorRetryStrategy::Fail);
        assert_eq!(status_error(403).to_retry_strategy(), ErrorRetryStrategy::Fail);
        assert_eq!(status_error(404).to_retry_strategy(), ErrorRetryStrategy::Fail);
    }

    #[test]
    fn fails_decoding_errors() {
        let source = serde_json::from_str::<Vec<i64>>("{").unwrap_err();
        let error = Error::EsiError(EsiError::Decode {
            endpoint: "/characters/1/assets/".to_string(),
            source,
        });

        assert_eq!(error.to_retry_strategy(), ErrorRetryStrategy::Fail);
    }

    #[test]
    fn fails_invalid_input() {
        let error = Error::InvalidInput("empty ID list".to_string());

        assert_eq!(error.to_retry_strategy(), ErrorRetryStrategy::Fail);
    }
}
