//! The artwork registry: the authoritative ordered collection of records plus
//! the currently selected record.
//!
//! All operations are synchronous and take `&mut self`, so there is exactly
//! one mutator at a time. Mutations go to the backing [`ArtworkStore`] first;
//! the in-memory collection only changes once the store has accepted the
//! write.

use log::{debug, info, warn};

use crate::artwork_model::{sample_artworks, ArtworkDraft, ArtworkRecord, Taggable};
use crate::artwork_store::{ArtworkStore, VolatileStore};
use crate::registry_config::{IdStrategy, RegistryConfig};
use crate::registry_error::RegistryError;

pub struct ArtworkRegistry {
    artworks: Vec<ArtworkRecord>,
    selected: Option<u64>,
    /// Highest id ever assigned or loaded.
    last_id: u64,
    id_strategy: IdStrategy,
    placeholder_image: String,
    store: Box<dyn ArtworkStore>,
}

impl Default for ArtworkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtworkRegistry {
    /// Empty registry, default configuration, nothing persisted.
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), &RegistryConfig::default(), Box::new(VolatileStore), 0)
    }

    /// In-memory registry pre-filled with `records`.
    ///
    /// Records repeating an earlier id are dropped.
    pub fn with_records(records: Vec<ArtworkRecord>) -> Self {
        Self::from_parts(records, &RegistryConfig::default(), Box::new(VolatileStore), 0)
    }

    /// In-memory registry holding the sample collection.
    pub fn with_samples() -> Self {
        Self::with_records(sample_artworks())
    }

    /// Opens the store named by `config.storage` and loads it.
    pub fn open(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let store = config.storage.open()?;
        Self::with_store(store, config)
    }

    /// Loads every record from `store`. When the store has never held
    /// anything and `config.seed_samples` is set, the sample collection is
    /// written to it first.
    pub fn with_store(mut store: Box<dyn ArtworkStore>, config: &RegistryConfig) -> Result<Self, RegistryError> {
        let mut records = store.load_all()?;
        let mut last_id = store.last_id()?.unwrap_or(0);

        if records.is_empty() && last_id == 0 && config.seed_samples {
            records = sample_artworks();
            for record in &records {
                last_id = last_id.max(record.id);
                store.put_with_last_id(record, last_id)?;
            }
            info!("Seeded registry with {} sample artworks", records.len());
        }

        let registry = Self::from_parts(records, config, store, last_id);
        info!("Artwork registry ready with {} records", registry.len());
        Ok(registry)
    }

    fn from_parts(
        records: Vec<ArtworkRecord>,
        config: &RegistryConfig,
        store: Box<dyn ArtworkStore>,
        last_id: u64,
    ) -> Self {
        let mut artworks: Vec<ArtworkRecord> = Vec::with_capacity(records.len());
        for record in records {
            if artworks.iter().any(|existing| existing.id == record.id) {
                warn!("Dropping artwork with duplicate id {}", record.id);
                continue;
            }
            artworks.push(record);
        }
        let max_loaded = artworks.iter().map(|r| r.id).max().unwrap_or(0);

        Self {
            artworks,
            selected: None,
            last_id: last_id.max(max_loaded),
            id_strategy: config.id_strategy,
            placeholder_image: config.placeholder_image.clone(),
            store,
        }
    }

    /// The full collection in insertion order.
    pub fn list(&self) -> &[ArtworkRecord] {
        &self.artworks
    }

    pub fn get(&self, id: u64) -> Option<&ArtworkRecord> {
        self.artworks.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    /// The id the next [`create`](Self::create) will assign.
    ///
    /// Fails with [`RegistryError::IdsExhausted`] once `u64::MAX` is taken.
    pub fn next_id(&self) -> Result<u64, RegistryError> {
        match self.id_strategy {
            IdStrategy::Monotonic => self.last_id.checked_add(1).ok_or(RegistryError::IdsExhausted),
            IdStrategy::CollectionLength => {
                let mut candidate = (self.artworks.len() as u64)
                    .checked_add(1)
                    .ok_or(RegistryError::IdsExhausted)?;
                while self.contains(candidate) {
                    candidate = candidate.checked_add(1).ok_or(RegistryError::IdsExhausted)?;
                }
                Ok(candidate)
            }
        }
    }

    /// Appends a record built from `draft` and returns it.
    ///
    /// A blank image is replaced by the placeholder URL. No other
    /// validation happens here; forms validate before calling in.
    pub fn create(&mut self, draft: ArtworkDraft) -> Result<&ArtworkRecord, RegistryError> {
        let id = self.next_id()?;
        if self.id_strategy == IdStrategy::CollectionLength && id != self.artworks.len() as u64 + 1 {
            warn!("Id {} already taken, assigning {id} instead", self.artworks.len() + 1);
        }

        let mut record = ArtworkRecord::from_draft(id, draft);
        if record.image.trim().is_empty() {
            record.image = self.placeholder_image.clone();
        }

        let last_id = self.last_id.max(id);
        self.store.put_with_last_id(&record, last_id)?;

        debug!("Created artwork {id} \"{}\"", record.title);
        self.last_id = last_id;
        self.artworks.push(record);
        Ok(&self.artworks[self.artworks.len() - 1])
    }

    /// Replaces every field of the record with `id`, keeping its id and
    /// position. Returns `false` and changes nothing when no record matches.
    pub fn update(&mut self, id: u64, fields: ArtworkDraft) -> Result<bool, RegistryError> {
        let Some(index) = self.position(id) else {
            warn!("Update ignored: no artwork with id {id}");
            return Ok(false);
        };

        let record = ArtworkRecord::from_draft(id, fields);
        self.store.put(&record)?;

        debug!("Updated artwork {id}");
        self.artworks[index] = record;
        Ok(true)
    }

    /// Removes the record with `id`, clearing the selection if it pointed at
    /// it. Returns `false` when no record matches.
    pub fn delete(&mut self, id: u64) -> Result<bool, RegistryError> {
        let Some(index) = self.position(id) else {
            warn!("Delete ignored: no artwork with id {id}");
            return Ok(false);
        };

        self.store.remove(id)?;
        self.artworks.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }

        debug!("Deleted artwork {id}");
        Ok(true)
    }

    /// Focuses a record for detail display; `None` clears the focus.
    ///
    /// An id with no record behind it also clears the focus.
    pub fn select(&mut self, id: Option<u64>) -> Option<&ArtworkRecord> {
        self.selected = match id {
            Some(id) if self.contains(id) => Some(id),
            Some(id) => {
                warn!("Select ignored: no artwork with id {id}");
                None
            }
            None => None,
        };
        self.selected()
    }

    pub fn selected(&self) -> Option<&ArtworkRecord> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    /// Adds a tag to a stored record. Returns whether the record changed.
    pub fn add_tag(&mut self, id: u64, tag: &str) -> Result<bool, RegistryError> {
        self.modify_tags(id, |record| record.add_tag(tag))
    }

    /// Removes a tag from a stored record. Returns whether the record changed.
    pub fn remove_tag(&mut self, id: u64, tag: &str) -> Result<bool, RegistryError> {
        self.modify_tags(id, |record| record.remove_tag(tag))
    }

    fn modify_tags<F>(&mut self, id: u64, change: F) -> Result<bool, RegistryError>
    where
        F: FnOnce(&mut ArtworkRecord) -> bool,
    {
        let index = self.position(id).ok_or(RegistryError::NotFound(id))?;

        let mut record = self.artworks[index].clone();
        if !change(&mut record) {
            return Ok(false);
        }
        self.store.put(&record)?;
        self.artworks[index] = record;
        Ok(true)
    }

    /// Removes every record and clears the selection. The id counter is kept,
    /// so ids handed out before are not reused under the monotonic strategy.
    pub fn clear(&mut self) -> Result<usize, RegistryError> {
        self.store.clear()?;
        let removed = self.artworks.len();
        self.artworks.clear();
        self.selected = None;

        info!("Cleared {removed} artworks");
        Ok(removed)
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.artworks.iter().position(|record| record.id == id)
    }
}
