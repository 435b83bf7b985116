use std::fmt;

use thiserror::Error;

/// Raised before any network call when a run configuration breaks its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("num_players must be at least 1")]
    NoPlayers,

    #[error("expected {expected} models for {expected} players, got {actual}")]
    ModelCountMismatch { expected: usize, actual: usize },

    #[error("model for player {player} is empty")]
    EmptyModel { player: usize },
}

/// Network or HTTP level failure talking to the simulation service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// The model list could not be fetched or was not a list of strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("model catalog unavailable: {reason}")]
pub struct CatalogUnavailable {
    pub reason: String,
}

impl CatalogUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Transport(#[from] TransportError),
}
