//! Parley key-agreement library
//!
//! Establishes a per-conversation shared secret between two chat
//! participants over an untrusted relay, and draws the encryption boundary
//! that consumes it.
//!
//! ## Primitives
//!
//! - **Group**: RFC 3526 2048-bit MODP prime (group 14), generator 2
//! - **Key agreement**: classic finite-field Diffie-Hellman, 256-bit private
//!   scalars, shared secret normalized to 32 bytes
//! - **Encryption**: pluggable [`MessageCipher`] boundary; the shipped
//!   primitive is ChaCha20-Poly1305 AEAD with an explicit per-message nonce
//!
//! ## Known limitations
//!
//! Exchanged public values are not authenticated. The protocol defeats
//! passive eavesdroppers only; an active relay substituting public values
//! can man-in-the-middle the exchange. Adding authentication is a separate
//! extension, not something this crate silently provides.
//!
//! Raw entropy buffers, derivation bytes, and derived secrets are zeroized,
//! but the `BigUint` private scalars are not wiped on drop — `num-bigint`
//! carries no `Zeroize` support, so freed limbs may linger in memory.

pub mod agreement;
pub mod cipher;
pub mod error;
pub mod group;
pub mod keypair;

pub use agreement::{SHARED_SECRET_SIZE, SharedSecret, derive_shared_secret};
pub use cipher::{AeadCipher, MessageCipher, NONCE_SIZE, random_nonce};
pub use error::CryptoError;
pub use keypair::KeyPair;
