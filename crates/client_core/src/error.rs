use shared::{domain::ParticipantId, error::ApiError};
use thiserror::Error;

use crate::session::{SessionAction, SessionState};

/// Local, recoverable failures of a round or a collection draft. None of these
/// end the process; the caller re-prompts the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("participant {0} is not part of this round")]
    NotFound(ParticipantId),
    #[error("participant {0} has already been eliminated")]
    AlreadyEliminated(ParticipantId),
    #[error("invalid round configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid collection: {0}")]
    InvalidCollection(String),
    #[error("cannot {action} while the session is {from}")]
    InvalidTransition {
        from: SessionState,
        action: SessionAction,
    },
    #[error("only {ready} of {total} players are ready")]
    NotReady { ready: usize, total: usize },
    #[error("the round has already ended")]
    SessionEnded,
    #[error("session runtime is no longer running")]
    RuntimeClosed,
}

impl SessionError {
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn invalid_collection(message: impl Into<String>) -> Self {
        Self::InvalidCollection(message.into())
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend rejected request: {0}")]
    Api(#[from] ApiError),
    #[error("invalid backend url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("not logged in")]
    Unauthenticated,
    #[error("backend response for {endpoint} carried no data")]
    MissingData { endpoint: String },
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to access credential file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("credential file '{path}' is corrupt: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
}
