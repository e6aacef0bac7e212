//! Shared helpers for decoding and verifying issued tokens.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use seidan_hsm::{KeyFamily, KeyHandle, PublicKey, testutil};
use serde_json::Value;

/// A token split into its decoded parts.
pub struct Decoded {
    pub header: Value,
    pub payload: Value,
    pub signature: Vec<u8>,
    pub signing_input: String,
}

pub fn decode(token: &str) -> Decoded {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "compact JWS has three parts: {token}");

    let json = |part: &str| -> Value {
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    };

    Decoded {
        header: json(parts[0]),
        payload: json(parts[1]),
        signature: URL_SAFE_NO_PAD.decode(parts[2]).unwrap(),
        signing_input: format!("{}.{}", parts[0], parts[1]),
    }
}

/// Verifies `token` against `key` using the algorithm in its header.
pub fn verify(token: &str, key: &PublicKey) -> Decoded {
    let decoded = decode(token);
    let message = decoded.signing_input.as_bytes();

    match (decoded.header["alg"].as_str().unwrap(), key) {
        ("RS256", PublicKey::Rsa(public_key)) => {
            use rsa::signature::Verifier;
            let verifying_key =
                rsa::pkcs1v15::VerifyingKey::<rsa::sha2::Sha256>::new(public_key.clone());
            let signature = rsa::pkcs1v15::Signature::try_from(decoded.signature.as_slice()).unwrap();
            verifying_key.verify(message, &signature).unwrap();
        }
        ("ES256", PublicKey::EcP256(public_key)) => {
            use p256::ecdsa::signature::Verifier;
            assert_eq!(decoded.signature.len(), 64);
            let verifying_key =
                p256::ecdsa::VerifyingKey::from_affine(*public_key.as_affine()).unwrap();
            let signature = p256::ecdsa::Signature::from_slice(&decoded.signature).unwrap();
            verifying_key.verify(message, &signature).unwrap();
        }
        ("EdDSA", PublicKey::Ed25519(verifying_key)) => {
            let signature = ed25519_dalek::Signature::from_slice(&decoded.signature).unwrap();
            verifying_key.verify_strict(message, &signature).unwrap();
        }
        (alg, key) => panic!("algorithm {alg} does not match key {key}"),
    }

    decoded
}

/// A fresh host key in its transport encoding.
pub fn host_key(family: KeyFamily) -> String {
    testutil::encode_host_key(&testutil::generate_public_key(family))
}

/// Writes a PKCS#8 PEM into a software key store and returns the key.
pub fn provision(root: &Path, name: &str, label: &str, family: KeyFamily) -> PublicKey {
    let pem = testutil::generate_pkcs8_pem(family);
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{label}.pem")), &pem).unwrap();

    seidan_hsm::SoftwareKey::from_pkcs8_pem(format!("{name}/{label}"), &pem)
        .unwrap()
        .public_key()
}
