//! Error types for token issuance.

use std::fmt;

/// Errors that can occur while issuing a cluster token.
///
/// Every variant is fatal for the invocation; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    /// The security module could not be initialized.
    ModuleInit {
        /// Description of the initialization failure
        reason: String,
    },
    /// Querying the security module for keys failed.
    KeyLookup {
        /// The namespaced key name that was queried
        name: String,
        /// Description of the query failure
        reason: String,
    },
    /// No key is registered for the cluster.
    NoKeys {
        /// The namespaced key name that was queried
        name: String,
    },
    /// An environment variable holds an unusable value.
    InvalidConfig {
        /// The offending variable
        variable: String,
        /// Why the value was rejected
        reason: String,
    },
    /// The expiration argument is not a non-negative day count.
    InvalidExpiration {
        /// The rejected input
        input: String,
    },
    /// The host key is not valid base64url.
    InvalidHostKeyEncoding {
        /// Description of the decoding error
        reason: String,
    },
    /// The host key decoded but is not a supported public key.
    InvalidHostKey {
        /// Description of the parsing error
        reason: String,
    },
    /// The signing key's type has no matching token algorithm.
    UnsupportedKeyType {
        /// Description of the key type
        key_type: String,
    },
    /// The signing key's public half could not be encoded.
    KeyEncoding {
        /// Description of the encoding error
        reason: String,
    },
    /// The token header or claims could not be serialized.
    TokenEncoding {
        /// Description of the serialization error
        reason: String,
    },
    /// The security module failed to sign the token.
    Signing {
        /// Display name of the signing key
        key: String,
        /// Description of the signing error
        reason: String,
    },
}

impl fmt::Display for IssueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleInit { reason } => {
                write!(f, "failed to initialize HSM: {reason}")
            }
            Self::KeyLookup { name, reason } => {
                write!(f, "failed to list HSM keys for '{name}': {reason}")
            }
            Self::NoKeys { name } => {
                write!(
                    f,
                    "failed to list HSM keys: no keys registered as '{name}'; please provision one"
                )
            }
            Self::InvalidConfig { variable, reason } => {
                write!(f, "invalid {variable}: {reason}")
            }
            Self::InvalidExpiration { input } => {
                write!(
                    f,
                    "invalid expiration '{input}': expected a whole number of days (0 for no expiration)"
                )
            }
            Self::InvalidHostKeyEncoding { reason } => {
                write!(f, "host key is not valid unpadded base64url: {reason}")
            }
            Self::InvalidHostKey { reason } => {
                write!(f, "host key is not a supported public key: {reason}")
            }
            Self::UnsupportedKeyType { key_type } => {
                write!(f, "unsupported key type {key_type}")
            }
            Self::KeyEncoding { reason } => {
                write!(f, "failed to encode signing key identifier: {reason}")
            }
            Self::TokenEncoding { reason } => {
                write!(f, "failed to encode token: {reason}")
            }
            Self::Signing { key, reason } => {
                write!(f, "failed to sign token with key '{key}': {reason}")
            }
        }
    }
}

impl std::error::Error for IssueError {}
