//! Cluster membership claims.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{AUDIENCE, SECONDS_PER_DAY};

/// Claims embedded in a cluster membership token.
///
/// Together they state "the key `sub`, known as `nam`, belongs to cluster
/// `iss`". Timestamps are seconds since the Unix epoch.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use seidan::HostClaims;
///
/// let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
/// let claims = HostClaims::builder("prod", "MCowBQYDK2VwAyEA", "web-1")
///     .issued_at(now)
///     .expires_in_days(30)
///     .build();
///
/// assert_eq!(claims.iss, "prod");
/// assert_eq!(claims.exp, Some(1_700_000_000 + 30 * 86_400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostClaims {
    /// Issuer: the cluster name
    pub iss: String,
    /// When the token was issued
    pub iat: i64,
    /// Subject: the host key exactly as supplied
    pub sub: String,
    /// Human-readable host name
    pub nam: String,
    /// Audience: the cluster directory service
    pub aud: String,
    /// When the token expires; absent for non-expiring tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl HostClaims {
    /// Creates a builder with the three caller-chosen claims.
    #[must_use]
    pub fn builder(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        name: impl Into<String>,
    ) -> HostClaimsBuilder {
        HostClaimsBuilder::new(issuer, subject, name)
    }

    /// Returns the issued-at time.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    /// Returns the expiration time, if the token expires.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }
}

/// Builder for [`HostClaims`].
#[derive(Debug, Clone)]
pub struct HostClaimsBuilder {
    issuer: String,
    subject: String,
    name: String,
    audience: String,
    expires_in_days: u32,
    issued_at: Option<DateTime<Utc>>,
}

impl HostClaimsBuilder {
    /// Creates a builder for a non-expiring token with the default audience.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            subject: subject.into(),
            name: name.into(),
            audience: AUDIENCE.to_string(),
            expires_in_days: 0,
            issued_at: None,
        }
    }

    /// Overrides the audience.
    #[must_use]
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Sets the validity period in whole days. Zero means no expiration.
    #[must_use]
    pub fn expires_in_days(mut self, days: u32) -> Self {
        self.expires_in_days = days;
        self
    }

    /// Sets the issue time. Defaults to the current time at `build`.
    #[must_use]
    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = Some(at);
        self
    }

    /// Builds the claims.
    #[must_use]
    pub fn build(self) -> HostClaims {
        let iat = self.issued_at.unwrap_or_else(Utc::now).timestamp();
        let exp = (self.expires_in_days > 0)
            .then(|| iat + i64::from(self.expires_in_days) * SECONDS_PER_DAY);

        HostClaims {
            iss: self.issuer,
            iat,
            sub: self.subject,
            nam: self.name,
            aud: self.audience,
            exp,
        }
    }
}
