//! Registry-level rejections.

use thiserror::Error;

use crate::core::{ConnectionId, SessionCode};
use crate::protocol::RejectCode;
use crate::rules::RuleError;

/// Why the registry refused an intent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("session {0} not found")]
    SessionNotFound(SessionCode),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("{0} already holds a seat")]
    AlreadySeated(ConnectionId),

    #[error("{0} holds no seat")]
    UnknownConnection(ConnectionId),

    #[error("malformed intent: {detail}")]
    Malformed { detail: String },

    #[error("internal error while handling {intent}")]
    Internal { intent: &'static str },
}

impl RegistryError {
    /// Reject code reported to the client.
    #[must_use]
    pub fn code(&self) -> RejectCode {
        match self {
            RegistryError::SessionNotFound(_) => RejectCode::SessionNotFound,
            RegistryError::Rule(err) => RejectCode::from(err),
            RegistryError::AlreadySeated(_) => RejectCode::AlreadySeated,
            RegistryError::UnknownConnection(_) => RejectCode::UnknownConnection,
            RegistryError::Malformed { .. } => RejectCode::Malformed,
            RegistryError::Internal { .. } => RejectCode::Internal,
        }
    }
}
