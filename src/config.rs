//! Process configuration resolved once at startup.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{CLUSTER_ENV, DEFAULT_CLUSTER, KEYSTORE_ENV, KEY_NAMESPACE};
use crate::error::IssueError;

/// The name of the cluster tokens are issued for.
///
/// Used both to find the signing key and as the `iss` claim. An empty name
/// falls back to `"default"`.
///
/// # Example
///
/// ```
/// use seidan::ClusterName;
///
/// let cluster = ClusterName::new("prod");
/// assert_eq!(cluster.key_name(), "seidan:prod");
///
/// assert_eq!(ClusterName::new("").as_str(), "default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterName(String);

impl ClusterName {
    /// Creates a cluster name, substituting the default for an empty string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::default()
        } else {
            Self(name)
        }
    }

    /// Returns the cluster name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name the cluster's signing key is registered under.
    #[must_use]
    pub fn key_name(&self) -> String {
        format!("{KEY_NAMESPACE}{}", self.0)
    }
}

impl Default for ClusterName {
    fn default() -> Self {
        Self(DEFAULT_CLUSTER.to_string())
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cluster tokens are issued for.
    ///
    /// Read from `CLUSTER`. Default: `"default"`
    pub cluster: ClusterName,

    /// Root directory of the software key store.
    ///
    /// Read from `SEIDAN_KEYSTORE`. Default: `<data dir>/seidan/keys`
    pub keystore: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: ClusterName::default(),
            keystore: default_keystore(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::InvalidConfig` if `CLUSTER` is set to a value
    /// that is not valid UTF-8.
    pub fn from_env() -> Result<Self, IssueError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its raw value.
    ///
    /// Unset and empty variables both take their defaults. A cluster name
    /// that is not UTF-8 is an error, never the default.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::InvalidConfig` if `CLUSTER` is not valid UTF-8.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self, IssueError> {
        let cluster = match lookup(CLUSTER_ENV) {
            Some(value) => ClusterName::new(value.into_string().map_err(|value| {
                IssueError::InvalidConfig {
                    variable: CLUSTER_ENV.to_string(),
                    reason: format!("{value:?} is not valid UTF-8"),
                }
            })?),
            None => ClusterName::default(),
        };
        let keystore = lookup(KEYSTORE_ENV)
            .filter(|value| !value.is_empty())
            .map_or_else(default_keystore, PathBuf::from);

        Ok(Self { cluster, keystore })
    }

    /// Sets the cluster.
    #[must_use]
    pub fn with_cluster(mut self, cluster: ClusterName) -> Self {
        self.cluster = cluster;
        self
    }

    /// Sets the key store directory.
    #[must_use]
    pub fn with_keystore(mut self, keystore: impl Into<PathBuf>) -> Self {
        self.keystore = keystore.into();
        self
    }
}

/// Returns the key store used when `SEIDAN_KEYSTORE` is unset.
#[must_use]
pub fn default_keystore() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("seidan")
        .join("keys")
}
