use super::{KeyValueStore, validate_key};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        validate_key(key)?;
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::io("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), AppError> {
        validate_key(key)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::io("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvStore;
    use crate::storage::KeyValueStore;

    #[test]
    fn put_then_get_returns_latest_value() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.put("k", "one").unwrap();
        store.put("k", "two").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }
}
