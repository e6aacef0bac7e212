//! In-memory security module.

use std::fmt;
use std::sync::Arc;

use crate::error::HsmError;
use crate::traits::{KeyHandle, SecurityModule};

/// A security module holding key handles in process memory.
///
/// Keys sharing a name are listed in insertion order. Useful for tests and
/// for embedding callers that already hold key handles.
///
/// # Example
///
/// ```
/// use seidan_hsm::{MemoryModule, SecurityModule};
///
/// let module = MemoryModule::new();
/// assert!(module.list_keys_by_name("seidan:default").unwrap().is_empty());
/// ```
#[derive(Default, Clone)]
pub struct MemoryModule {
    keys: Vec<(String, Arc<dyn KeyHandle>)>,
}

impl MemoryModule {
    /// Creates an empty module.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` under `name`.
    pub fn insert(&mut self, name: impl Into<String>, key: impl KeyHandle + 'static) {
        self.insert_shared(name, Arc::new(key));
    }

    /// Registers an already shared key handle under `name`.
    pub fn insert_shared(&mut self, name: impl Into<String>, key: Arc<dyn KeyHandle>) {
        self.keys.push((name.into(), key));
    }

    /// Returns the total number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SecurityModule for MemoryModule {
    fn list_keys_by_name(&self, name: &str) -> Result<Vec<Arc<dyn KeyHandle>>, HsmError> {
        Ok(self
            .keys
            .iter()
            .filter(|(key_name, _)| key_name == name)
            .map(|(_, key)| Arc::clone(key))
            .collect())
    }
}

impl fmt::Debug for MemoryModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryModule")
            .field("keys", &self.keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyFamily;
    use crate::testutil;

    #[test]
    fn lists_only_matching_name() {
        let mut module = MemoryModule::new();
        module.insert("seidan:a", testutil::generate_key("a1", KeyFamily::Ed25519));
        module.insert("seidan:b", testutil::generate_key("b1", KeyFamily::Ed25519));

        let keys = module.list_keys_by_name("seidan:a").unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].display_name(), "a1");
    }

    #[test]
    fn preserves_insertion_order() {
        let mut module = MemoryModule::new();
        module.insert("seidan:a", testutil::generate_key("second", KeyFamily::Ed25519));
        module.insert("seidan:a", testutil::generate_key("first", KeyFamily::EcP256));

        let names: Vec<_> = module
            .list_keys_by_name("seidan:a")
            .unwrap()
            .iter()
            .map(|key| key.display_name().to_string())
            .collect();

        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn unknown_name_is_empty() {
        let mut module = MemoryModule::new();
        module.insert("seidan:a", testutil::generate_key("a1", KeyFamily::Ed25519));

        assert!(module.list_keys_by_name("seidan:zzz").unwrap().is_empty());
        assert_eq!(module.len(), 1);
        assert!(!module.is_empty());
    }
}
