//! DH keypair generation.
//!
//! Each conversation gets one keypair per participant, generated at
//! create/join time. The private scalar never leaves local storage.

use num_bigint::BigUint;
use num_traits::One;
use rand::RngCore;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::group;

/// Bytes of entropy drawn for a private key (256 bits).
pub const PRIVATE_KEY_BYTES: usize = 32;

/// A DH keypair over the fixed group: private scalar in `[1, P-2]` and
/// public value `G^private mod P`.
pub struct KeyPair {
    private: BigUint,
    public: BigUint,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &group::to_hex(&self.public))
            .field("private", &"[REDACTED]")
            .finish()
    }
}

impl KeyPair {
    /// Generate a new random keypair.
    ///
    /// Draws 256 bits from the OS secure random source and reduces into
    /// `[1, P-2]`. Fails with `EntropyUnavailable` if the source cannot
    /// supply bytes; there is no fallback to a non-cryptographic generator.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut buf = [0u8; PRIVATE_KEY_BYTES];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|_| CryptoError::EntropyUnavailable)?;
        let raw = BigUint::from_bytes_be(&buf);
        buf.zeroize();

        let span = group::modulus() - 2u32;
        let private = raw % span + BigUint::one();
        Ok(Self::from_private_key(private))
    }

    /// Reconstruct a keypair from a stored private scalar.
    ///
    /// Recomputes the public value, so a reloaded session can re-expose the
    /// same public key it originally transmitted.
    pub fn from_private_key(private: BigUint) -> Self {
        let public = group::generator().modpow(&private, group::modulus());
        Self { private, public }
    }

    /// The private scalar. Handle with care.
    pub const fn private_key(&self) -> &BigUint {
        &self.private
    }

    /// The public value `G^private mod P`.
    pub const fn public_key(&self) -> &BigUint {
        &self.public
    }

    /// The public value as transport hex.
    pub fn public_hex(&self) -> String {
        group::to_hex(&self.public)
    }
}
