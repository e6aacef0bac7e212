//! Key generation helpers for tests.
//!
//! Feature-gated behind `testutil`; the shipped crates never generate keys.
//!
//! ```toml
//! [dev-dependencies]
//! seidan-hsm = { path = "seidan-hsm", features = ["testutil"] }
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use pkcs8::{EncodePrivateKey, LineEnding, SecretDocument};
use rand::rngs::OsRng;

use crate::{KeyFamily, PublicKey, SoftwareKey};

/// RSA modulus size used for generated test keys.
pub const RSA_TEST_BITS: usize = 2048;

/// Generates a fresh private key of `family` as a PKCS#8 PEM string.
///
/// # Panics
///
/// Panics if key generation or encoding fails.
#[must_use]
pub fn generate_pkcs8_pem(family: KeyFamily) -> String {
    let pem = match family {
        KeyFamily::Rsa => rsa::RsaPrivateKey::new(&mut OsRng, RSA_TEST_BITS)
            .expect("rsa key generation")
            .to_pkcs8_pem(LineEnding::LF),
        KeyFamily::EcP256 => p256::SecretKey::random(&mut OsRng).to_pkcs8_pem(LineEnding::LF),
        KeyFamily::Ed25519 => {
            ed25519_dalek::SigningKey::generate(&mut OsRng).to_pkcs8_pem(LineEnding::LF)
        }
    };
    pem.expect("pkcs8 pem encoding").to_string()
}

/// Returns a PKCS#8 PEM holding an X25519 key.
///
/// X25519 is a key-agreement algorithm, so the key is well-formed but outside
/// every signing family.
///
/// # Panics
///
/// Panics if PEM encoding fails.
#[must_use]
pub fn x25519_pkcs8_pem() -> String {
    let mut der = vec![
        0x30, 0x2e, // SEQUENCE, 46 bytes
        0x02, 0x01, 0x00, // INTEGER version 0
        0x30, 0x05, // SEQUENCE, 5 bytes (algorithm identifier)
        0x06, 0x03, 0x2b, 0x65, 0x6e, // OID 1.3.101.110 (X25519)
        0x04, 0x22, // OCTET STRING, 34 bytes
        0x04, 0x20, // OCTET STRING, 32 bytes (the actual key)
    ];
    der.extend_from_slice(&[0x42; 32]);

    SecretDocument::try_from(der)
        .expect("x25519 pkcs8 der")
        .to_pem("PRIVATE KEY", LineEnding::LF)
        .expect("x25519 pkcs8 pem")
        .to_string()
}

/// Generates a fresh in-memory key of `family`.
///
/// # Panics
///
/// Panics if key generation fails.
#[must_use]
pub fn generate_key(display_name: &str, family: KeyFamily) -> SoftwareKey {
    SoftwareKey::from_pkcs8_pem(display_name, &generate_pkcs8_pem(family))
        .expect("generated key loads")
}

/// Generates the public half of a fresh key of `family`.
///
/// # Panics
///
/// Panics if key generation fails.
#[must_use]
pub fn generate_public_key(family: KeyFamily) -> PublicKey {
    use crate::KeyHandle;

    generate_key("public", family).public_key()
}

/// Encodes `key` the way hosts present their keys: base64url SPKI DER
/// without padding.
///
/// # Panics
///
/// Panics if `key` cannot be encoded.
#[must_use]
pub fn encode_host_key(key: &PublicKey) -> String {
    URL_SAFE_NO_PAD.encode(key.to_spki_der().expect("spki encoding"))
}
