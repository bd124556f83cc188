//! Cipher boundary for message payloads.
//!
//! The key-exchange core only guarantees both sides hold the same 32-byte
//! secret; the symmetric primitive behind `MessageCipher` is pluggable.
//! The shipped implementation is ChaCha20-Poly1305 AEAD, so decryption
//! failures (wrong key, tampering) surface as explicit errors rather than
//! silent garbage.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::agreement::SharedSecret;
use crate::error::CryptoError;

/// Nonce size for the shipped AEAD primitive.
pub const NONCE_SIZE: usize = 12;

/// A symmetric cipher keyed per call by a conversation's derived secret.
///
/// The nonce is an explicit per-call parameter: callers must supply a fresh
/// value for every message and transmit it alongside the ciphertext.
pub trait MessageCipher {
    /// Encrypt a plaintext payload.
    fn encrypt(
        &self,
        plaintext: &[u8],
        secret: &SharedSecret,
        nonce: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt a ciphertext payload. Fails with `DecryptionFailed` on
    /// authentication failure; never returns corrupted plaintext.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        secret: &SharedSecret,
        nonce: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

/// ChaCha20-Poly1305 implementation of the cipher boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct AeadCipher;

fn check_nonce(nonce: &[u8]) -> Result<&Nonce, CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidNonceLength {
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }
    Ok(Nonce::from_slice(nonce))
}

impl MessageCipher for AeadCipher {
    fn encrypt(
        &self,
        plaintext: &[u8],
        secret: &SharedSecret,
        nonce: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = check_nonce(nonce)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(secret.as_bytes()));
        cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        secret: &SharedSecret,
        nonce: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let nonce = check_nonce(nonce)?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(secret.as_bytes()));
        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
    }
}

/// Generate a fresh random nonce for one message.
pub fn random_nonce() -> Result<[u8; NONCE_SIZE], CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|_| CryptoError::EntropyUnavailable)?;
    Ok(nonce)
}
