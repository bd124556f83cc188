//! Shared-secret derivation.
//!
//! Both sides of a conversation run `derive_shared_secret` with their own
//! private scalar and the peer's public value. The group's commutativity
//! (`(g^a)^b == (g^b)^a mod P`) guarantees byte-identical results, which is
//! the contract the cipher boundary relies on.

use num_bigint::BigUint;
use num_traits::One;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::group;

/// Size of a derived shared secret in bytes (256 bits).
pub const SHARED_SECRET_SIZE: usize = 32;

/// A derived per-conversation shared secret.
///
/// Fixed-width key material for the cipher boundary. Zeroized on drop;
/// equality is constant-time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedSecret").field(&"[REDACTED]").finish()
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SharedSecret {}

impl SharedSecret {
    /// Wrap raw 32-byte key material.
    pub const fn from_bytes(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw key bytes.
    pub const fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }

    /// Encode as 64 lowercase hex chars (the persisted store format).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from the persisted hex form. Must be exactly 32 bytes.
    pub fn from_hex(value: &str) -> Result<Self, CryptoError> {
        let bytes =
            hex::decode(value).map_err(|_| CryptoError::MalformedHex(value.to_string()))?;
        let mut arr = [0u8; SHARED_SECRET_SIZE];
        if bytes.len() != SHARED_SECRET_SIZE {
            return Err(CryptoError::InvalidSecretLength {
                expected: SHARED_SECRET_SIZE,
                actual: bytes.len(),
            });
        }
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

/// Derive the conversation's shared secret from our private scalar and the
/// peer's public value.
///
/// The peer value is untrusted transport input: values `<= 1` or `>= P-1`
/// are rejected with `InvalidPublicValue` since they collapse the secret to
/// a trivial subgroup (or indicate a corrupted peer). The raw
/// `peer^private mod P` result is normalized to exactly 32 bytes: low-order
/// 32 big-endian bytes if longer, left-padded with zeros if shorter. The
/// normalization is a fixed-width contract for the cipher boundary, not a
/// security measure.
pub fn derive_shared_secret(
    my_private: &BigUint,
    their_public: &BigUint,
) -> Result<SharedSecret, CryptoError> {
    let p = group::modulus();
    if *their_public <= BigUint::one() || *their_public >= p - 1u32 {
        return Err(CryptoError::InvalidPublicValue);
    }

    let raw = their_public.modpow(my_private, p);
    let mut bytes = raw.to_bytes_be();

    let mut out = [0u8; SHARED_SECRET_SIZE];
    if bytes.len() >= SHARED_SECRET_SIZE {
        out.copy_from_slice(&bytes[bytes.len() - SHARED_SECRET_SIZE..]);
    } else {
        out[SHARED_SECRET_SIZE - bytes.len()..].copy_from_slice(&bytes);
    }
    bytes.zeroize();

    Ok(SharedSecret(out))
}
