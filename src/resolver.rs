//! Locates the cluster's signing key in a security module.

use std::sync::Arc;

use seidan_hsm::{KeyHandle, SecurityModule};

use crate::config::ClusterName;
use crate::error::IssueError;

/// Returns the signing key registered for `cluster`.
///
/// Keys are looked up under `"seidan:" + cluster`. When several keys share
/// that name, the first one listed by the module wins; the module's listing
/// order is the only tie-break.
///
/// # Errors
///
/// Returns `IssueError::KeyLookup` if the module query fails and
/// `IssueError::NoKeys` if no key is registered for the cluster.
///
/// # Example
///
/// ```
/// use seidan::{ClusterName, IssueError, resolve_signing_key};
/// use seidan_hsm::MemoryModule;
///
/// let module = MemoryModule::new();
/// let result = resolve_signing_key(&module, &ClusterName::new("test"));
///
/// assert!(matches!(result, Err(IssueError::NoKeys { .. })));
/// ```
pub fn resolve_signing_key(
    module: &dyn SecurityModule,
    cluster: &ClusterName,
) -> Result<Arc<dyn KeyHandle>, IssueError> {
    let name = cluster.key_name();
    let keys = module
        .list_keys_by_name(&name)
        .map_err(|e| IssueError::KeyLookup {
            name: name.clone(),
            reason: e.to_string(),
        })?;

    if keys.len() > 1 {
        tracing::debug!(name = %name, count = keys.len(), "multiple keys registered, using the first");
    }

    let key = keys
        .into_iter()
        .next()
        .ok_or(IssueError::NoKeys { name })?;

    tracing::info!(key = %key.display_name(), "found key");
    Ok(key)
}
