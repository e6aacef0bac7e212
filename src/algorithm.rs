//! Maps signing key types to token signature algorithms.

use std::fmt;

use seidan_hsm::PublicKey;

use crate::error::IssueError;

/// A JWS signature algorithm (RFC 7518).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    Rs256,
    /// ECDSA using P-256 and SHA-256.
    Es256,
    /// Edwards-curve signatures (Ed25519).
    EdDsa,
}

impl Algorithm {
    /// Selects the algorithm matching the signing key.
    ///
    /// The mapping is closed: RSA → `RS256`, P-256 → `ES256`,
    /// Ed25519 → `EdDSA`. Every other key type is rejected.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::UnsupportedKeyType` for keys outside the three
    /// supported families.
    ///
    /// # Example
    ///
    /// ```
    /// use seidan::Algorithm;
    /// use seidan_hsm::PublicKey;
    ///
    /// let x25519 = PublicKey::Other { algorithm: "1.3.101.110".into() };
    /// assert!(Algorithm::for_public_key(&x25519).is_err());
    /// ```
    pub fn for_public_key(key: &PublicKey) -> Result<Self, IssueError> {
        match key {
            PublicKey::Rsa(_) => Ok(Self::Rs256),
            PublicKey::EcP256(_) => Ok(Self::Es256),
            PublicKey::Ed25519(_) => Ok(Self::EdDsa),
            PublicKey::Other { .. } => Err(IssueError::UnsupportedKeyType {
                key_type: key.to_string(),
            }),
        }
    }

    /// Returns the `alg` header value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rs256 => "RS256",
            Self::Es256 => "ES256",
            Self::EdDsa => "EdDSA",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
