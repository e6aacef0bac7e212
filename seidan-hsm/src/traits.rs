//! Security module and key handle traits.

use std::fmt;
use std::sync::Arc;

use crate::{HsmError, PublicKey};

/// A reference to a private key held inside a security module.
///
/// Handles never expose private key material. Callers can read the public
/// half and ask the module to sign on their behalf.
///
/// # Signature encodings
///
/// The bytes returned by [`KeyHandle::sign`] depend on the key family:
///
/// | Family | Scheme | Encoding |
/// |--------|--------|----------|
/// | RSA | RSASSA-PKCS1-v1_5 with SHA-256 | raw signature, modulus length |
/// | EC P-256 | ECDSA with SHA-256 | ASN.1 DER `SEQUENCE { r, s }` |
/// | Ed25519 | PureEdDSA | raw 64 bytes |
///
/// Hashing happens inside the module; callers pass the full message.
pub trait KeyHandle: fmt::Debug + Send + Sync {
    /// Returns a stable, human-readable identifier for this key.
    fn display_name(&self) -> &str;

    /// Returns the public half of the key.
    fn public_key(&self) -> PublicKey;

    /// Signs `message` with the key.
    ///
    /// # Errors
    ///
    /// Returns `HsmError::Signing` if the module fails to produce a signature,
    /// or `HsmError::UnsupportedKey` if the key cannot be used for signing.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, HsmError>;
}

/// A security module that stores keys under names.
///
/// Several keys may share a name. Implementations document the order in
/// which [`SecurityModule::list_keys_by_name`] returns them.
pub trait SecurityModule {
    /// Lists all keys registered under `name`.
    ///
    /// An unknown name yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `HsmError` if the module cannot be queried or if the name is
    /// not a valid lookup key.
    fn list_keys_by_name(&self, name: &str) -> Result<Vec<Arc<dyn KeyHandle>>, HsmError>;
}
