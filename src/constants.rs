//! Constants shared by token issuance.

/// Prefix prepended to the cluster name to form the signing key's lookup name.
pub const KEY_NAMESPACE: &str = "seidan:";

/// Cluster name used when none is configured.
pub const DEFAULT_CLUSTER: &str = "default";

/// Audience claim carried by every token: the cluster directory service.
pub const AUDIENCE: &str = "directory.atonline.com";

/// Token type placed in the `typ` header.
pub const TOKEN_TYPE: &str = "JWT";

/// Seconds in one day of token validity.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Environment variable holding the cluster name.
pub const CLUSTER_ENV: &str = "CLUSTER";

/// Environment variable holding the software key store directory.
pub const KEYSTORE_ENV: &str = "SEIDAN_KEYSTORE";
