use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use super::models::{FavoriteCity, Settings};
use super::storage::KeyValueStore;

pub const FAVORITES_KEY: &str = "weatherdash_favorites";
pub const SETTINGS_KEY: &str = "weatherdash_settings";

/// Favorites and display settings on top of a key-value store
///
/// Failures never propagate: they are logged and the caller sees the
/// empty list or the default settings.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    // Each blob is read-modify-written under its own lock
    favorites_lock: Mutex<()>,
    settings_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            favorites_lock: Mutex::new(()),
            settings_lock: Mutex::new(()),
        }
    }

    pub async fn get_favorites(&self) -> Vec<FavoriteCity> {
        self.read_json(FAVORITES_KEY).await.unwrap_or_default()
    }

    pub async fn save_favorites(&self, favorites: &[FavoriteCity]) {
        let _guard = self.favorites_lock.lock().await;
        self.write_json(FAVORITES_KEY, favorites).await;
    }

    /// Add a city unless one with the same name exists. Returns whether it was added.
    pub async fn add_favorite(&self, city: FavoriteCity) -> bool {
        let _guard = self.favorites_lock.lock().await;
        let mut favorites = self.get_favorites().await;

        if favorites.iter().any(|f| f.matches(&city.name)) {
            tracing::debug!(city = %city.name, "City already in favorites");
            return false;
        }

        tracing::info!(city = %city.name, "Adding favorite");
        favorites.push(city);
        self.write_json(FAVORITES_KEY, &favorites).await;
        true
    }

    /// Remove a city by name. Returns whether anything was removed.
    pub async fn remove_favorite(&self, name: &str) -> bool {
        let _guard = self.favorites_lock.lock().await;
        let mut favorites = self.get_favorites().await;
        let before = favorites.len();

        favorites.retain(|f| !f.matches(name));

        if favorites.len() == before {
            return false;
        }

        tracing::info!(city = %name, "Removed favorite");
        self.write_json(FAVORITES_KEY, &favorites).await;
        true
    }

    pub async fn get_settings(&self) -> Settings {
        self.read_json(SETTINGS_KEY).await.unwrap_or_default()
    }

    pub async fn save_settings(&self, settings: &Settings) {
        let _guard = self.settings_lock.lock().await;
        self.write_json(SETTINGS_KEY, settings).await;
    }

    /// Apply `update` to the stored settings and save them. Returns the new settings.
    pub async fn update_settings(&self, update: impl FnOnce(&mut Settings)) -> Settings {
        let _guard = self.settings_lock.lock().await;
        let mut settings = self.get_settings().await;
        update(&mut settings);
        self.write_json(SETTINGS_KEY, &settings).await;
        settings
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Error loading preference");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Error parsing preference, using default");
                None
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Error serializing preference");
                return;
            }
        };

        if let Err(e) = self.store.set(key, &raw).await {
            tracing::error!(key = %key, error = %e, "Error saving preference");
        }
    }
}
