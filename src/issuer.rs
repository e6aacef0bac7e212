//! Token issuer for cluster membership.

use std::fmt;
use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use seidan_hsm::KeyHandle;

use crate::algorithm::Algorithm;
use crate::claims::HostClaims;
use crate::config::ClusterName;
use crate::error::IssueError;
use crate::host_key::HostKey;
use crate::token::Token;

/// Issues membership tokens for one cluster.
///
/// The issuer holds a handle to the cluster's signing key. The token
/// algorithm and key identifier are derived from the key once, up front.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use seidan::{ClusterName, HostKey, Issuer};
/// use seidan_hsm::{KeyFamily, testutil};
///
/// let key = testutil::generate_key("seidan:test/primary", KeyFamily::Ed25519);
/// let issuer = Issuer::new(ClusterName::new("test"), Arc::new(key)).unwrap();
///
/// let host = testutil::encode_host_key(&testutil::generate_public_key(KeyFamily::EcP256));
/// let host_key = HostKey::parse(&host).unwrap();
///
/// let token = issuer.issue("host1", &host_key, 30).unwrap();
/// assert_eq!(token.split('.').count(), 3);
/// ```
#[derive(Clone)]
pub struct Issuer {
    cluster: ClusterName,
    key: Arc<dyn KeyHandle>,
    algorithm: Algorithm,
    key_id: String,
}

impl Issuer {
    /// Creates an issuer signing with `key` on behalf of `cluster`.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::UnsupportedKeyType` if the key has no matching
    /// token algorithm, or `IssueError::KeyEncoding` if its public half
    /// cannot be encoded as a key identifier.
    pub fn new(cluster: ClusterName, key: Arc<dyn KeyHandle>) -> Result<Self, IssueError> {
        let public_key = key.public_key();
        let algorithm = Algorithm::for_public_key(&public_key)?;
        let spki = public_key
            .to_spki_der()
            .map_err(|e| IssueError::KeyEncoding {
                reason: e.to_string(),
            })?;

        Ok(Self {
            cluster,
            key,
            algorithm,
            key_id: URL_SAFE_NO_PAD.encode(spki),
        })
    }

    /// Returns the cluster this issuer vouches for.
    #[must_use]
    pub fn cluster(&self) -> &ClusterName {
        &self.cluster
    }

    /// Returns the token signature algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the `kid` header value: the signer's SPKI DER, base64url.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Returns the signing key handle.
    #[must_use]
    pub fn signing_key(&self) -> &Arc<dyn KeyHandle> {
        &self.key
    }

    /// Issues a token stating that `host_key`, known as `name`, belongs to
    /// the cluster.
    ///
    /// `days` is the validity period; zero issues a token without `exp`.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::TokenEncoding` or `IssueError::Signing` if the
    /// token cannot be produced.
    pub fn issue(&self, name: &str, host_key: &HostKey, days: u32) -> Result<String, IssueError> {
        self.issue_at(name, host_key, days, Utc::now())
    }

    /// Issues a token as of `now`.
    ///
    /// # Errors
    ///
    /// Same as [`Issuer::issue`].
    pub fn issue_at(
        &self,
        name: &str,
        host_key: &HostKey,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<String, IssueError> {
        let claims = HostClaims::builder(self.cluster.as_str(), host_key.as_str(), name)
            .issued_at(now)
            .expires_in_days(days)
            .build();

        self.issue_claims(&claims)
    }

    /// Signs pre-built claims.
    ///
    /// # Errors
    ///
    /// Same as [`Issuer::issue`].
    pub fn issue_claims(&self, claims: &HostClaims) -> Result<String, IssueError> {
        let mut token = Token::new(self.algorithm);
        token
            .header_mut()
            .insert("kid".into(), self.key_id.clone().into());
        token.set_claims(claims)?;

        let signed = token.sign(self.key.as_ref())?;
        tracing::debug!(
            key = %self.key.display_name(),
            alg = %self.algorithm,
            sub = %claims.sub,
            "issued token"
        );
        Ok(signed)
    }
}

impl fmt::Debug for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Issuer")
            .field("cluster", &self.cluster)
            .field("key", &self.key.display_name())
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
