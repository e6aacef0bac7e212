//! Public keys of the supported families and their SPKI encoding.

use std::fmt;

use pkcs8::{DecodePublicKey, EncodePublicKey, ObjectIdentifier};
use spki::SubjectPublicKeyInfoRef;

use crate::error::HsmError;

/// `rsaEncryption` (RFC 8017).
pub(crate) const RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// `id-ecPublicKey` (RFC 5480).
pub(crate) const EC_PUBLIC_KEY: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// `secp256r1` named curve (RFC 5480).
pub(crate) const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
/// `id-Ed25519` (RFC 8410).
pub(crate) const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// The key families this crate can sign with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    /// RSA keys of any modulus size the `rsa` crate accepts.
    Rsa,
    /// ECDSA keys on NIST P-256.
    EcP256,
    /// Ed25519 keys.
    Ed25519,
}

impl KeyFamily {
    /// Returns a short lowercase name for the family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::EcP256 => "ec-p256",
            Self::Ed25519 => "ed25519",
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A public key as reported by a security module.
///
/// The set of variants is closed. Keys of families outside
/// [`KeyFamily`] are carried as [`PublicKey::Other`] so that callers can
/// report them, but they cannot be encoded or signed with.
///
/// # Example
///
/// ```
/// use seidan_hsm::PublicKey;
///
/// let other = PublicKey::Other { algorithm: "1.3.101.110".into() };
/// assert_eq!(other.family(), None);
/// assert!(other.to_spki_der().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// An RSA public key.
    Rsa(rsa::RsaPublicKey),
    /// A NIST P-256 public key.
    EcP256(p256::PublicKey),
    /// An Ed25519 public key.
    Ed25519(ed25519_dalek::VerifyingKey),
    /// A key of an unsupported family.
    Other {
        /// Algorithm identifier of the key, usually a dotted OID
        algorithm: String,
    },
}

impl PublicKey {
    /// Parses a DER-encoded `SubjectPublicKeyInfo`.
    ///
    /// Only the families in [`KeyFamily`] are accepted. EC keys must be on
    /// P-256.
    ///
    /// # Errors
    ///
    /// Returns `HsmError::InvalidKey` if the bytes are not a well-formed key,
    /// or `HsmError::UnsupportedKey` if the key belongs to another family.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, HsmError> {
        let spki = SubjectPublicKeyInfoRef::try_from(der).map_err(invalid_key)?;
        let oid = spki.algorithm.oid;

        if oid == RSA_ENCRYPTION {
            rsa::RsaPublicKey::from_public_key_der(der)
                .map(Self::Rsa)
                .map_err(invalid_key)
        } else if oid == EC_PUBLIC_KEY {
            let curve = spki.algorithm.parameters_oid().map_err(invalid_key)?;
            if curve != SECP256R1 {
                return Err(HsmError::UnsupportedKey {
                    algorithm: format!("ecdsa curve {curve}"),
                });
            }
            p256::PublicKey::from_public_key_der(der)
                .map(Self::EcP256)
                .map_err(invalid_key)
        } else if oid == ED25519 {
            ed25519_dalek::VerifyingKey::from_public_key_der(der)
                .map(Self::Ed25519)
                .map_err(invalid_key)
        } else {
            Err(HsmError::UnsupportedKey {
                algorithm: oid.to_string(),
            })
        }
    }

    /// Encodes the key as a DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns `HsmError::UnsupportedKey` for [`PublicKey::Other`] and
    /// `HsmError::Encoding` if serialization fails.
    pub fn to_spki_der(&self) -> Result<Vec<u8>, HsmError> {
        let document = match self {
            Self::Rsa(key) => key.to_public_key_der(),
            Self::EcP256(key) => key.to_public_key_der(),
            Self::Ed25519(key) => key.to_public_key_der(),
            Self::Other { algorithm } => {
                return Err(HsmError::UnsupportedKey {
                    algorithm: algorithm.clone(),
                });
            }
        }
        .map_err(|e| HsmError::Encoding {
            reason: e.to_string(),
        })?;

        Ok(document.into_vec())
    }

    /// Returns the family of the key, or `None` for unsupported keys.
    #[must_use]
    pub const fn family(&self) -> Option<KeyFamily> {
        match self {
            Self::Rsa(_) => Some(KeyFamily::Rsa),
            Self::EcP256(_) => Some(KeyFamily::EcP256),
            Self::Ed25519(_) => Some(KeyFamily::Ed25519),
            Self::Other { .. } => None,
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other { algorithm } => write!(f, "unsupported({algorithm})"),
            key => match key.family() {
                Some(family) => write!(f, "{family}"),
                None => f.write_str("unknown"),
            },
        }
    }
}

pub(crate) fn invalid_key(err: impl fmt::Display) -> HsmError {
    HsmError::InvalidKey {
        reason: err.to_string(),
    }
}
