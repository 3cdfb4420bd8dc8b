use seed::browser::web_storage::{LocalStorage, WebStorage};
use serde::{Serialize, de::DeserializeOwned};
use shared::preferences::{PreferenceStore, StoreError};

/// `window.localStorage`, holding JSON-encoded values.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStore;

impl PreferenceStore for BrowserStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        LocalStorage::get(key).ok()
    }

    fn store<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        LocalStorage::insert(key, value).map_err(|err| StoreError(format!("{err:?}")))
    }
}
