use crate::store::{ CredentialStore, StoreError };
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// JSON document of key-value pairs at a fixed path, rewritten on every
/// mutation. The whole document is small (two tokens and a user profile).
pub struct FileCredentialStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY };
    use uuid::Uuid;

    fn temp_store_path() -> PathBuf {
        std::env::temp_dir().join(format!("threadchat-store-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn values_survive_reopening_the_store() {
        let path = temp_store_path();

        {
            let store = FileCredentialStore::new(&path).unwrap();
            store.set(ACCESS_TOKEN_KEY, "at").unwrap();
            store.set(REFRESH_TOKEN_KEY, "rt").unwrap();
        }

        let reopened = FileCredentialStore::new(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("at"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("rt"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn remove_deletes_only_the_named_key() {
        let path = temp_store_path();
        let store = FileCredentialStore::new(&path).unwrap();
        store.set(ACCESS_TOKEN_KEY, "at").unwrap();
        store.set(REFRESH_TOKEN_KEY, "rt").unwrap();

        store.remove(ACCESS_TOKEN_KEY).unwrap();
        assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());
        assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("rt"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let path = temp_store_path();
        let store = FileCredentialStore::new(&path).unwrap();
        assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());
    }
}
