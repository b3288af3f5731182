use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Per-document context cache. Re-parsing the same file on every iteration
/// of a 500-iteration batch is pure waste; keying on the path keeps the
/// observable behavior identical to reloading.
pub struct ContextCache {
    contexts: Arc<DashMap<String, String>>,
    max_entries: usize,
}

impl ContextCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            contexts: Arc::new(DashMap::new()),
            max_entries,
        }
    }

    pub fn get(&self, path: &str) -> Option<String> {
        let key = self.hash_path(path);
        self.contexts.get(&key).map(|r| r.value().clone())
    }

    pub fn set(&self, path: &str, context: String) {
        if self.contexts.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self
                .contexts
                .iter()
                .take(self.max_entries / 4)
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.contexts.remove(&key);
            }
        }
        let key = self.hash_path(path);
        self.contexts.insert(key, context);
    }

    pub fn clear(&self) {
        self.contexts.clear();
    }

    fn hash_path(&self, path: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl Default for ContextCache {
    fn default() -> Self {
        Self::new(64)
    }
}
