//! Fixed DH group parameters and hex codec for group elements.
//!
//! All arithmetic in this crate happens modulo the RFC 3526 2048-bit MODP
//! prime (group 14) with generator 2. Every participant must use the same
//! parameters; a mismatch makes derived secrets incompatible.

use std::sync::LazyLock;

use num_bigint::BigUint;
use num_traits::Num;

use crate::error::CryptoError;

/// RFC 3526 2048-bit MODP group prime (group 14), big-endian hex.
const MODP_2048_PRIME_HEX: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7EDEE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3BE39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF6955817183995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E208E24FA074E5AB3143DB5BFCE0FD108E4B82D120A93AD2CAFFFFFFFFFFFFFFFF";

#[allow(clippy::expect_used)]
static PRIME: LazyLock<BigUint> = LazyLock::new(|| {
    BigUint::from_str_radix(MODP_2048_PRIME_HEX, 16).expect("RFC 3526 prime constant is valid hex")
});

static GENERATOR: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(2u32));

/// The group modulus `P`.
pub fn modulus() -> &'static BigUint {
    &PRIME
}

/// The group generator `G`.
pub fn generator() -> &'static BigUint {
    &GENERATOR
}

/// Parse a hex-encoded group element or key scalar.
///
/// Accepts mixed case and arbitrary length, no `0x` prefix. Peer public
/// values arrive through the transport in this form and are untrusted;
/// range validation happens separately at derivation time.
pub fn parse_hex(value: &str) -> Result<BigUint, CryptoError> {
    BigUint::from_str_radix(value, 16).map_err(|_| CryptoError::MalformedHex(value.to_string()))
}

/// Encode a group element or key scalar as lowercase hex without padding.
pub fn to_hex(value: &BigUint) -> String {
    format!("{value:x}")
}
