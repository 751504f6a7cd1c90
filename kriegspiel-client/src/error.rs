//! Error types for the networked client

use std::io;
use std::path::PathBuf;

use kriegspiel_core::{CoreError, Faction};

/// A single inbound line that could not be turned into a message
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message has no \"type\" field")]
    MissingType,

    #[error("Invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] CoreError),
}

/// Conditions that end a session or the whole client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Assigned faction {assigned}, but this client only plays {supported}")]
    UnsupportedFaction { assigned: Faction, supported: Faction },

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Transport error: {0}")]
    Transport(#[source] io::Error),

    #[error("Connection closed before the game ended")]
    ConnectionLost,

    #[error("Gave up after {attempts} connection attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<ClientError> },

    #[error("Failed to write {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Outbound task failed: {0}")]
    OutboundTask(String),
}

impl ClientError {
    /// Transport failures are worth another connection attempt; everything
    /// else ends the client.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Connect { .. } | ClientError::Transport(_) | ClientError::ConnectionLost
        )
    }
}
