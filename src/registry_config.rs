//! Registry configuration.
//!
//! Hosts pass configuration as JSON (through `gallery_open` or
//! [`RegistryConfig::from_json`]). Every field is optional:
//!
//! ```json
//! {
//!   "placeholderImage": "https://example.com/placeholder.jpg",
//!   "idStrategy": "monotonic",
//!   "seedSamples": true,
//!   "storage": { "kind": "lmdb", "path": "gallery", "mapSize": 10485760 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::artwork_model::PLACEHOLDER_IMAGE_URL;
use crate::artwork_store::{ArtworkStore, LmdbStore, VolatileStore, DEFAULT_MAP_SIZE};
use crate::registry_error::StoreError;

/// How new artwork ids are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// One more than the highest id ever assigned. Ids are never reused.
    #[default]
    Monotonic,
    /// `collection length + 1`, stepping past any id already taken.
    /// Deleting the newest record lets its id be handed out again.
    CollectionLength,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Nothing survives the process.
    #[default]
    Memory,
    Lmdb {
        /// Environment name; the directory is `<path>.lmdb`.
        path: String,
        #[serde(default = "default_map_size", rename = "mapSize")]
        map_size: usize,
    },
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

impl StorageConfig {
    /// Opens the configured backend.
    pub fn open(&self) -> Result<Box<dyn ArtworkStore>, StoreError> {
        match self {
            StorageConfig::Memory => Ok(Box::new(VolatileStore)),
            StorageConfig::Lmdb { path, map_size } => Ok(Box::new(LmdbStore::init(path, *map_size)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    /// Image URL given to records created without one.
    pub placeholder_image: String,
    pub id_strategy: IdStrategy,
    /// Insert the sample artworks when the store starts out empty.
    pub seed_samples: bool,
    pub storage: StorageConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            placeholder_image: PLACEHOLDER_IMAGE_URL.to_string(),
            id_strategy: IdStrategy::default(),
            seed_samples: false,
            storage: StorageConfig::default(),
        }
    }
}

impl RegistryConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_samples(mut self) -> Self {
        self.seed_samples = true;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }
}
