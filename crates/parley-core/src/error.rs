//! Error types for the Parley core library.

use thiserror::Error;

/// Result type alias using the Parley core Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for session and exchange operations.
///
/// Sequencing errors (`UnknownSession`, `SessionNotReady`, `SecretNotReady`)
/// mean the caller must re-check exchange state before retrying. Invariant
/// violations (`DuplicateSession`, `SecretMismatch`) signal an upstream bug
/// and are never auto-resolved by overwriting key material.
#[derive(Debug, Error)]
pub enum Error {
    /// Failure from the key-agreement or cipher layer.
    #[error(transparent)]
    Crypto(#[from] parley_crypto::CryptoError),

    /// A session already exists for this conversation with a different
    /// private key.
    #[error("Conversation {conversation_id} already has a session with a different private key")]
    DuplicateSession { conversation_id: u64 },

    /// No session record exists for this conversation.
    #[error("No session exists for conversation {conversation_id}")]
    UnknownSession { conversation_id: u64 },

    /// A different shared secret is already recorded for this conversation.
    #[error("Conversation {conversation_id} already has a different shared secret recorded")]
    SecretMismatch { conversation_id: u64 },

    /// No local key material has been generated for this conversation.
    #[error("Conversation {conversation_id} has no local key material yet")]
    SessionNotReady { conversation_id: u64 },

    /// Local key exists but the shared secret has not been derived yet.
    #[error("Shared secret for conversation {conversation_id} has not been derived yet")]
    SecretNotReady { conversation_id: u64 },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
