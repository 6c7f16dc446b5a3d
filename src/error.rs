use thiserror::Error;

/// Failure reported by a protocol client adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("client query failed: {reason}")]
pub struct ClientQueryError {
    pub reason: String,
}

impl ClientQueryError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no delegation extension registered for protocol {0}")]
    UnsupportedProtocol(String),

    #[error("{requested} delegatees requested, at most {max} supported")]
    UnsupportedCardinality { max: usize, requested: usize },

    #[error("client query failed: {reason}")]
    ClientQuery { reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("remote configuration unavailable: {0}")]
    RemoteConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<ClientQueryError> for Error {
    fn from(err: ClientQueryError) -> Self {
        Error::ClientQuery { reason: err.reason }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteConfig(err.to_string())
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_reason() {
        let err: Error = ClientQueryError::new("node unreachable").into();
        match err {
            Error::ClientQuery { reason } => assert_eq!(reason, "node unreachable"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn cardinality_message_names_both_counts() {
        let err = Error::UnsupportedCardinality {
            max: 1,
            requested: 3,
        };
        assert_eq!(err.to_string(), "3 delegatees requested, at most 1 supported");
    }
}
