pub mod handlers;
pub mod models;
pub mod service;
pub mod storage;

#[cfg(test)]
pub mod testing;

pub use models::{FavoriteCity, Settings, TemperatureUnit, Theme};
pub use service::PreferenceStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
