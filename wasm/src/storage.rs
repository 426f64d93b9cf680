//! Browser `localStorage` backend

use fitcalc_shared::{KeyValueStore, StorageError};
use wasm_bindgen::JsValue;

/// [`KeyValueStore`] over `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn from_window() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Backend("no global window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Backend("localStorage is unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::Backend(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use fitcalc_shared::persistence::keys;
    use fitcalc_shared::Preferences;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_round_trip() {
        let mut prefs = Preferences::new(LocalStorage::from_window().unwrap());
        prefs.clear_all().unwrap();
        prefs.save(keys::HEIGHT, &180.0).unwrap();
        assert_eq!(prefs.load(keys::HEIGHT, 0.0), 180.0);
        prefs.clear_all().unwrap();
        assert_eq!(prefs.load(keys::HEIGHT, 0.0), 0.0);
    }
}
