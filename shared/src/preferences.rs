//! Persisted map preferences: the chosen base layer and the overlay toggle.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::layers::{self, TileLayer};

pub const LAYER_KEY: &str = "layer";
pub const OVERLAY_KEY: &str = "getOverlay";

#[derive(Debug, Error)]
#[error("preference store error: {0}")]
pub struct StoreError(pub String);

/// Key-value storage holding JSON-encoded values.
pub trait PreferenceStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
    fn store<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError>;
}

/// Map events that change what gets persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerEvent {
    BaseLayerChange(String),
    OverlayAdd,
    OverlayRemove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerPreferences {
    pub base_layer: &'static TileLayer,
    pub overlay: bool,
}

impl Default for LayerPreferences {
    fn default() -> Self {
        Self {
            base_layer: layers::default_base_layer(),
            overlay: false,
        }
    }
}

impl LayerPreferences {
    /// Reads the startup state; unknown layer names fall back to the default layer.
    pub fn load(store: &impl PreferenceStore) -> Self {
        let base_layer = store
            .load::<String>(LAYER_KEY)
            .and_then(|name| layers::base_layer(&name))
            .unwrap_or_else(layers::default_base_layer);
        let overlay = store.load::<bool>(OVERLAY_KEY).unwrap_or(false);
        Self {
            base_layer,
            overlay,
        }
    }

    pub fn record(
        &mut self,
        store: &mut impl PreferenceStore,
        event: &LayerEvent,
    ) -> Result<(), StoreError> {
        match event {
            LayerEvent::BaseLayerChange(name) => {
                if let Some(layer) = layers::base_layer(name) {
                    self.base_layer = layer;
                }
                store.store(LAYER_KEY, name)
            }
            LayerEvent::OverlayAdd => {
                self.overlay = true;
                store.store(OVERLAY_KEY, &true)
            }
            LayerEvent::OverlayRemove => {
                self.overlay = false;
                store.store(OVERLAY_KEY, &false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Default)]
    struct MemoryStore {
        entries: HashMap<String, String>,
    }

    impl MemoryStore {
        fn raw(&self, key: &str) -> Option<&str> {
            self.entries.get(key).map(String::as_str)
        }
    }

    impl PreferenceStore for MemoryStore {
        fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
            let raw = self.entries.get(key)?;
            serde_json::from_str(raw).ok()
        }

        fn store<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
            let raw = serde_json::to_string(value).map_err(|err| StoreError(err.to_string()))?;
            self.entries.insert(key.to_string(), raw);
            Ok(())
        }
    }

    #[test]
    fn empty_store_yields_defaults() {
        let prefs = LayerPreferences::load(&MemoryStore::default());
        assert_eq!(prefs, LayerPreferences::default());
    }

    #[test]
    fn events_are_persisted_under_layer_and_overlay_keys() {
        let mut store = MemoryStore::default();
        let mut prefs = LayerPreferences::load(&store);

        prefs
            .record(&mut store, &LayerEvent::BaseLayerChange("OpenTopoMap".into()))
            .unwrap();
        prefs.record(&mut store, &LayerEvent::OverlayAdd).unwrap();
        assert_eq!(store.raw(LAYER_KEY), Some("\"OpenTopoMap\""));
        assert_eq!(store.raw(OVERLAY_KEY), Some("true"));

        let reloaded = LayerPreferences::load(&store);
        assert_eq!(reloaded.base_layer.label, "OpenTopoMap");
        assert!(reloaded.overlay);

        prefs.record(&mut store, &LayerEvent::OverlayRemove).unwrap();
        assert!(!LayerPreferences::load(&store).overlay);
    }

    #[test]
    fn unknown_stored_layer_falls_back_to_default() {
        let mut store = MemoryStore::default();
        store.store(LAYER_KEY, &"Mapbox Streets").unwrap();
        assert_eq!(
            LayerPreferences::load(&store).base_layer,
            layers::default_base_layer()
        );
    }
}
