//! Cluster membership token issuance for seidan.
//!
//! A host joins a cluster by presenting a token signed with the cluster's
//! key. This crate resolves that key from a security module, validates the
//! host's public key, and produces a compact JWS (JWT) vouching for it.
//!
//! # Overview
//!
//! ```text
//! CLUSTER ──► resolve "seidan:<cluster>" ──► KeyHandle
//!                                               │
//! host key ──► HostKey::parse ──► HostClaims ──► Token::sign ──► token
//! ```
//!
//! The private key never leaves the security module; signing goes through
//! [`seidan_hsm::KeyHandle`].
//!
//! # Quick Start
//!
//! ```rust
//! use seidan::{ClusterName, HostKey, Issuer, resolve_signing_key};
//! use seidan_hsm::{KeyFamily, MemoryModule, testutil};
//!
//! let mut module = MemoryModule::new();
//! module.insert(
//!     "seidan:test",
//!     testutil::generate_key("seidan:test/primary", KeyFamily::EcP256),
//! );
//!
//! let cluster = ClusterName::new("test");
//! let key = resolve_signing_key(&module, &cluster).unwrap();
//! let issuer = Issuer::new(cluster, key).unwrap();
//!
//! let host = testutil::encode_host_key(&testutil::generate_public_key(KeyFamily::Ed25519));
//! let token = issuer.issue("host1", &HostKey::parse(&host).unwrap(), 365).unwrap();
//!
//! assert_eq!(token.split('.').count(), 3);
//! ```
//!
//! # Token Structure
//!
//! | Part | Field | Value |
//! |------|-------|-------|
//! | header | `alg` | `RS256`, `ES256` or `EdDSA`, from the signing key |
//! | header | `kid` | base64url DER `SubjectPublicKeyInfo` of the signing key |
//! | header | `typ` | `JWT` |
//! | payload | `iss` | cluster name |
//! | payload | `iat` | issue time, Unix seconds |
//! | payload | `sub` | host key, verbatim |
//! | payload | `nam` | host name |
//! | payload | `aud` | `directory.atonline.com` |
//! | payload | `exp` | `iat + days * 86400`, only when days > 0 |

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod algorithm;
mod claims;
pub mod cli;
mod config;
mod constants;
mod error;
mod host_key;
mod issuer;
pub mod prelude;
mod resolver;
mod token;

pub use algorithm::Algorithm;
pub use claims::{HostClaims, HostClaimsBuilder};
pub use config::{ClusterName, Config, default_keystore};
pub use constants::{
    AUDIENCE, CLUSTER_ENV, DEFAULT_CLUSTER, KEY_NAMESPACE, KEYSTORE_ENV, SECONDS_PER_DAY,
    TOKEN_TYPE,
};
pub use error::IssueError;
pub use host_key::HostKey;
pub use issuer::Issuer;
pub use resolver::resolve_signing_key;
pub use token::Token;
