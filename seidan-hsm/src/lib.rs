//! Security module abstraction for seidan cluster tokens.
//!
//! A security module holds private keys and signs on request. Callers only
//! ever see a [`KeyHandle`]: a display name, the public key, and a sign
//! operation. Private key material never leaves the module's boundary.
//!
//! # Modules
//!
//! | Type | Backing store |
//! |------|---------------|
//! | [`SoftwareModule`] | Directory of PKCS#8 PEM files |
//! | [`MemoryModule`] | Handles registered in process memory |
//!
//! # Supported key families
//!
//! | Family | SPKI algorithm | Notes |
//! |--------|----------------|-------|
//! | RSA | `rsaEncryption` | PKCS#1 v1.5 signatures with SHA-256 |
//! | EC P-256 | `id-ecPublicKey` + `secp256r1` | ECDSA with SHA-256, DER signatures |
//! | Ed25519 | `id-Ed25519` | PureEdDSA |
//!
//! Any other key is reported as [`PublicKey::Other`].
//!
//! # Example
//!
//! ```
//! use seidan_hsm::{MemoryModule, SecurityModule};
//!
//! let module = MemoryModule::new();
//! let keys = module.list_keys_by_name("seidan:default").unwrap();
//! assert!(keys.is_empty());
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod memory;
mod public_key;
mod software;
mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use error::HsmError;
pub use memory::MemoryModule;
pub use public_key::{KeyFamily, PublicKey};
pub use software::{SoftwareKey, SoftwareModule};
pub use traits::{KeyHandle, SecurityModule};
