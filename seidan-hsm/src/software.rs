//! Directory-backed software security module.
//!
//! Keys live on disk as PKCS#8 PEM files grouped by name:
//!
//! ```text
//! <root>/
//!   seidan:prod/
//!     2024-primary.pem
//!     2025-primary.pem
//!   seidan:staging/
//!     primary.pem
//! ```
//!
//! Every `*.pem` file in a name's directory is one key. Keys are listed in
//! lexicographic file-name order.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pkcs8::{DecodePrivateKey, PrivateKeyInfo, SecretDocument};
use rsa::sha2::Sha256;
use rsa::signature::SignatureEncoding;

use crate::error::HsmError;
use crate::public_key::{EC_PUBLIC_KEY, ED25519, RSA_ENCRYPTION, SECP256R1, invalid_key};
use crate::traits::{KeyHandle, SecurityModule};
use crate::PublicKey;

/// PEM label of a PKCS#8 private key.
const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// A security module backed by a directory of PKCS#8 PEM files.
///
/// # Example
///
/// ```no_run
/// use seidan_hsm::{SecurityModule, SoftwareModule};
///
/// let module = SoftwareModule::open("/var/lib/seidan/keys").unwrap();
/// let keys = module.list_keys_by_name("seidan:prod").unwrap();
/// println!("{} key(s)", keys.len());
/// ```
#[derive(Debug, Clone)]
pub struct SoftwareModule {
    root: PathBuf,
}

impl SoftwareModule {
    /// Opens the key store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `HsmError::Unavailable` if `root` does not exist or is not a
    /// directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, HsmError> {
        let root = root.into();
        let metadata = fs::metadata(&root).map_err(|e| HsmError::Unavailable {
            location: root.display().to_string(),
            reason: e.to_string(),
        })?;
        if !metadata.is_dir() {
            return Err(HsmError::Unavailable {
                location: root.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        tracing::debug!(root = %root.display(), "opened software security module");
        Ok(Self { root })
    }

    /// Returns the directory this module reads keys from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_paths(&self, name: &str) -> Result<Vec<PathBuf>, HsmError> {
        let dir = self.root.join(name);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&dir, &e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&dir, &e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "pem") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl SecurityModule for SoftwareModule {
    fn list_keys_by_name(&self, name: &str) -> Result<Vec<Arc<dyn KeyHandle>>, HsmError> {
        validate_name(name)?;

        self.key_paths(name)?
            .into_iter()
            .map(|path| {
                let label = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let pem = fs::read_to_string(&path).map_err(|e| io_error(&path, &e))?;
                let key = SoftwareKey::from_pkcs8_pem(format!("{name}/{label}"), &pem)?;
                tracing::trace!(key = %key.display_name, family = %key.public_key, "loaded key");
                Ok(Arc::new(key) as Arc<dyn KeyHandle>)
            })
            .collect()
    }
}

/// Rejects names that would escape the module root or address it directly.
fn validate_name(name: &str) -> Result<(), HsmError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(HsmError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn io_error(path: &Path, err: &io::Error) -> HsmError {
    HsmError::Io {
        reason: format!("{}: {err}", path.display()),
    }
}

enum Signer {
    Rsa(Box<rsa::pkcs1v15::SigningKey<Sha256>>),
    EcP256(p256::ecdsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
    Unsupported,
}

/// A private key loaded into process memory from PKCS#8.
///
/// `Debug` output only shows the display name and public key.
pub struct SoftwareKey {
    display_name: String,
    public_key: PublicKey,
    signer: Signer,
}

impl SoftwareKey {
    /// Loads a key from a PEM-encoded PKCS#8 `PRIVATE KEY` block.
    ///
    /// # Errors
    ///
    /// Returns `HsmError::InvalidKey` if the PEM or the key inside it is
    /// malformed.
    pub fn from_pkcs8_pem(display_name: impl Into<String>, pem: &str) -> Result<Self, HsmError> {
        let (label, document) = SecretDocument::from_pem(pem).map_err(invalid_key)?;
        if label != PRIVATE_KEY_LABEL {
            return Err(HsmError::InvalidKey {
                reason: format!("expected a PKCS#8 '{PRIVATE_KEY_LABEL}' block, found '{label}'"),
            });
        }
        Self::from_pkcs8_der(display_name, document.as_bytes())
    }

    /// Loads a key from DER-encoded PKCS#8.
    ///
    /// Keys outside the supported families load successfully; their public
    /// key is [`PublicKey::Other`] and signing with them fails.
    ///
    /// # Errors
    ///
    /// Returns `HsmError::InvalidKey` if the key is malformed.
    pub fn from_pkcs8_der(display_name: impl Into<String>, der: &[u8]) -> Result<Self, HsmError> {
        let info = PrivateKeyInfo::try_from(der).map_err(invalid_key)?;
        let oid = info.algorithm.oid;

        let (public_key, signer) = if oid == RSA_ENCRYPTION {
            let key = rsa::RsaPrivateKey::from_pkcs8_der(der).map_err(invalid_key)?;
            let public_key = PublicKey::Rsa(key.to_public_key());
            let signer = rsa::pkcs1v15::SigningKey::<Sha256>::new(key);
            (public_key, Signer::Rsa(Box::new(signer)))
        } else if oid == EC_PUBLIC_KEY
            && info
                .algorithm
                .parameters_oid()
                .is_ok_and(|curve| curve == SECP256R1)
        {
            let key = p256::ecdsa::SigningKey::from_pkcs8_der(der).map_err(invalid_key)?;
            let public_key = PublicKey::EcP256(p256::PublicKey::from(key.verifying_key()));
            (public_key, Signer::EcP256(key))
        } else if oid == ED25519 {
            let key = ed25519_dalek::SigningKey::from_pkcs8_der(der).map_err(invalid_key)?;
            (PublicKey::Ed25519(key.verifying_key()), Signer::Ed25519(key))
        } else {
            let algorithm = match info.algorithm.parameters_oid() {
                Ok(curve) if oid == EC_PUBLIC_KEY => format!("ecdsa curve {curve}"),
                _ => oid.to_string(),
            };
            (PublicKey::Other { algorithm }, Signer::Unsupported)
        };

        Ok(Self {
            display_name: display_name.into(),
            public_key,
            signer,
        })
    }
}

impl KeyHandle for SoftwareKey {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn public_key(&self) -> PublicKey {
        self.public_key.clone()
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, HsmError> {
        match &self.signer {
            Signer::Rsa(key) => {
                rsa::signature::Signer::<rsa::pkcs1v15::Signature>::try_sign(&**key, message)
                    .map(|signature| signature.to_vec())
                    .map_err(signing_error)
            }
            Signer::EcP256(key) => {
                p256::ecdsa::signature::Signer::<p256::ecdsa::Signature>::try_sign(key, message)
                    .map(|signature| signature.to_der().as_bytes().to_vec())
                    .map_err(signing_error)
            }
            Signer::Ed25519(key) => {
                ed25519_dalek::Signer::<ed25519_dalek::Signature>::try_sign(key, message)
                    .map(|signature| signature.to_bytes().to_vec())
                    .map_err(signing_error)
            }
            Signer::Unsupported => Err(HsmError::UnsupportedKey {
                algorithm: match &self.public_key {
                    PublicKey::Other { algorithm } => algorithm.clone(),
                    key => key.to_string(),
                },
            }),
        }
    }
}

fn signing_error(err: impl fmt::Display) -> HsmError {
    HsmError::Signing {
        reason: err.to_string(),
    }
}

impl fmt::Debug for SoftwareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareKey")
            .field("display_name", &self.display_name)
            .field("public_key", &self.public_key.to_string())
            .finish_non_exhaustive()
    }
}
