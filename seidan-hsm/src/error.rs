//! Error types for security module operations.

use std::fmt;

/// Errors that can occur while talking to a security module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HsmError {
    /// The module could not be opened.
    Unavailable {
        /// Location the module was expected at
        location: String,
        /// Why the module could not be opened
        reason: String,
    },
    /// Reading from the module's backing storage failed.
    Io {
        /// Description of the I/O failure
        reason: String,
    },
    /// The key name cannot be used as a lookup key.
    InvalidName {
        /// The rejected name
        name: String,
    },
    /// Stored or supplied key material is malformed.
    InvalidKey {
        /// Description of the key error
        reason: String,
    },
    /// The key belongs to an algorithm family this module cannot use.
    UnsupportedKey {
        /// Algorithm identifier of the key
        algorithm: String,
    },
    /// A public key could not be encoded.
    Encoding {
        /// Description of the encoding error
        reason: String,
    },
    /// The sign operation failed.
    Signing {
        /// Description of the signing error
        reason: String,
    },
}

impl fmt::Display for HsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { location, reason } => {
                write!(f, "security module at '{location}' is unavailable: {reason}")
            }
            Self::Io { reason } => {
                write!(f, "security module I/O error: {reason}")
            }
            Self::InvalidName { name } => {
                write!(
                    f,
                    "invalid key name '{name}'; names must be non-empty and contain no path separators"
                )
            }
            Self::InvalidKey { reason } => {
                write!(f, "invalid key material: {reason}")
            }
            Self::UnsupportedKey { algorithm } => {
                write!(f, "unsupported key type {algorithm}")
            }
            Self::Encoding { reason } => {
                write!(f, "failed to encode public key: {reason}")
            }
            Self::Signing { reason } => {
                write!(f, "sign operation failed: {reason}")
            }
        }
    }
}

impl std::error::Error for HsmError {}
