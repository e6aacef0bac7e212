//! The candidate host key a token vouches for.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use seidan_hsm::{HsmError, PublicKey};

use crate::error::IssueError;

/// A host public key as supplied by the caller.
///
/// The key arrives as unpadded base64url over a DER `SubjectPublicKeyInfo`.
/// Parsing only checks that it is a well-formed key of a supported family;
/// the family does not have to match the cluster signing key. The caller's
/// string is kept verbatim and becomes the token's `sub` claim.
///
/// # Example
///
/// ```
/// use seidan::{HostKey, IssueError};
///
/// let result = HostKey::parse("not base64url!");
/// assert!(matches!(result, Err(IssueError::InvalidHostKeyEncoding { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKey {
    encoded: String,
    key: PublicKey,
}

impl HostKey {
    /// Decodes and validates an encoded host key.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::InvalidHostKeyEncoding` if `encoded` is not
    /// unpadded base64url, or `IssueError::InvalidHostKey` if the decoded
    /// bytes are not a supported public key.
    pub fn parse(encoded: &str) -> Result<Self, IssueError> {
        let der = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| IssueError::InvalidHostKeyEncoding {
                reason: e.to_string(),
            })?;

        let key = PublicKey::from_spki_der(&der).map_err(|e| IssueError::InvalidHostKey {
            reason: match e {
                HsmError::InvalidKey { reason } => reason,
                other => other.to_string(),
            },
        })?;

        Ok(Self {
            encoded: encoded.to_string(),
            key,
        })
    }

    /// Returns the key exactly as the caller supplied it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Returns the parsed public key.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }
}
