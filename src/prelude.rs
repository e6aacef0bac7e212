//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use seidan::prelude::*;
//!
//! let cluster = ClusterName::new("prod");
//! assert_eq!(cluster.key_name(), "seidan:prod");
//! ```
//!
//! The CLI entry points in [`crate::cli`] are left out.

pub use crate::{
    // Issuance
    Algorithm, ClusterName, Config, HostClaims, HostKey, Issuer, Token, resolve_signing_key,
    // Errors
    IssueError,
};

pub use seidan_hsm::{KeyHandle, SecurityModule};
