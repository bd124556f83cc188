//! Crypto error types.

/// Errors from cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Secure random source could not supply entropy")]
    EntropyUnavailable,

    #[error("Peer public value out of range for the DH group")]
    InvalidPublicValue,

    #[error("Malformed hex value: {0}")]
    MalformedHex(String),

    #[error("Invalid secret length: expected {expected}, got {actual}")]
    InvalidSecretLength { expected: usize, actual: usize },

    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
}
