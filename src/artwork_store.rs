//! Persistence backends for the artwork registry.
//!
//! The registry talks to storage only through [`ArtworkStore`], so it stays
//! agnostic of where records live. Two backends are provided:
//!
//! - [`VolatileStore`]: keeps nothing. The registry's own collection is the
//!   only copy and it is gone when the process exits.
//! - [`LmdbStore`]: records and the id high-water mark in an LMDB environment
//!   on disk, surviving restarts.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Cursor, Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::artwork_model::ArtworkRecord;
use crate::registry_error::StoreError;

/// Default LMDB map size: 10 MiB.
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;

const ARTWORKS_DB: &str = "artworks";
const META_DB: &str = "meta";
const LAST_ID_KEY: &[u8] = b"next_id";

/// Storage boundary behind the registry.
///
/// Every mutating call must be durable (or fail) before it returns; the
/// registry only touches its in-memory collection after the store accepted
/// the change.
pub trait ArtworkStore: Send {
    /// All stored records, ordered by id.
    fn load_all(&self) -> Result<Vec<ArtworkRecord>, StoreError>;

    /// Inserts or overwrites the record keyed by its id.
    fn put(&mut self, record: &ArtworkRecord) -> Result<(), StoreError>;

    /// Removes a record, returning whether it existed.
    fn remove(&mut self, id: u64) -> Result<bool, StoreError>;

    /// Removes every record and returns how many were removed. The id
    /// high-water mark is left alone.
    fn clear(&mut self) -> Result<usize, StoreError>;

    /// Highest id ever handed out, if the store remembers one.
    fn last_id(&self) -> Result<Option<u64>, StoreError>;

    fn set_last_id(&mut self, id: u64) -> Result<(), StoreError>;

    /// Writes a new record together with the id high-water mark. Either both
    /// land or neither does.
    fn put_with_last_id(&mut self, record: &ArtworkRecord, last_id: u64) -> Result<(), StoreError>;
}

/// A store that persists nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct VolatileStore;

impl ArtworkStore for VolatileStore {
    fn load_all(&self) -> Result<Vec<ArtworkRecord>, StoreError> {
        Ok(Vec::new())
    }

    fn put(&mut self, _record: &ArtworkRecord) -> Result<(), StoreError> {
        Ok(())
    }

    fn remove(&mut self, _id: u64) -> Result<bool, StoreError> {
        Ok(true)
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        Ok(0)
    }

    fn last_id(&self) -> Result<Option<u64>, StoreError> {
        Ok(None)
    }

    fn set_last_id(&mut self, _id: u64) -> Result<(), StoreError> {
        Ok(())
    }

    fn put_with_last_id(&mut self, _record: &ArtworkRecord, _last_id: u64) -> Result<(), StoreError> {
        Ok(())
    }
}

/// LMDB-backed store.
///
/// The environment lives in a directory named `<name>.lmdb`. Records are kept
/// in the `artworks` database keyed by their id as 8 big-endian bytes, so a
/// cursor walk yields them in id order. The `meta` database holds the id
/// high-water mark.
///
/// ```no_run
/// use gallery_inventory_core::artwork_store::{ArtworkStore, LmdbStore, DEFAULT_MAP_SIZE};
///
/// let store = LmdbStore::init("gallery", DEFAULT_MAP_SIZE)?;
/// let records = store.load_all()?;
/// println!("{} artworks on disk", records.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LmdbStore {
    env: Environment,
    artworks: Database,
    meta: Database,
    path: PathBuf,
}

impl LmdbStore {
    /// Opens (creating if needed) the environment at `<name>.lmdb`.
    pub fn init(name: impl AsRef<Path>, map_size: usize) -> Result<Self, StoreError> {
        let mut dir = name.as_ref().as_os_str().to_owned();
        dir.push(".lmdb");
        let path = PathBuf::from(dir);

        fs::create_dir_all(&path)?;

        let env = Environment::new()
            .set_max_dbs(2)
            .set_map_size(map_size)
            .open(&path)?;
        let artworks = env.create_db(Some(ARTWORKS_DB), DatabaseFlags::empty())?;
        let meta = env.create_db(Some(META_DB), DatabaseFlags::empty())?;

        info!("Opened artwork store at {}", path.display());

        Ok(Self { env, artworks, meta, path })
    }

    /// Directory holding the LMDB environment.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize, StoreError> {
        let txn = self.env.begin_ro_txn()?;
        let count = {
            let mut cursor = txn.open_ro_cursor(self.artworks)?;
            cursor.iter().count()
        };
        txn.commit()?;
        Ok(count)
    }
}

impl ArtworkStore for LmdbStore {
    fn load_all(&self) -> Result<Vec<ArtworkRecord>, StoreError> {
        let txn = self.env.begin_ro_txn()?;
        let records = {
            let mut cursor = txn.open_ro_cursor(self.artworks)?;
            let mut records = Vec::new();
            for (_key, value) in cursor.iter() {
                let record: ArtworkRecord = serde_json::from_slice(value)?;
                records.push(record);
            }
            records
        };
        txn.commit()?;

        debug!("Loaded {} artworks from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn put(&mut self, record: &ArtworkRecord) -> Result<(), StoreError> {
        let json = serde_json::to_vec(record)?;
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.artworks, &id_key(record.id), &json, WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }

    fn remove(&mut self, id: u64) -> Result<bool, StoreError> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.artworks, &id_key(id), None) {
            Ok(()) => {
                txn.commit()?;
                Ok(true)
            }
            Err(lmdb::Error::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        let count = self.count()?;
        let mut txn = self.env.begin_rw_txn()?;
        txn.clear_db(self.artworks)?;
        txn.commit()?;
        Ok(count)
    }

    fn last_id(&self) -> Result<Option<u64>, StoreError> {
        let txn = self.env.begin_ro_txn()?;
        let last = match txn.get(self.meta, &LAST_ID_KEY) {
            Ok(bytes) => Some(decode_id(bytes)?),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.commit()?;
        Ok(last)
    }

    fn set_last_id(&mut self, id: u64) -> Result<(), StoreError> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.meta, &LAST_ID_KEY, &id_key(id), WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }

    fn put_with_last_id(&mut self, record: &ArtworkRecord, last_id: u64) -> Result<(), StoreError> {
        let json = serde_json::to_vec(record)?;
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.artworks, &id_key(record.id), &json, WriteFlags::empty())?;
        txn.put(self.meta, &LAST_ID_KEY, &id_key(last_id), WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }
}

fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

fn decode_id(bytes: &[u8]) -> Result<u64, StoreError> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StoreError::Corrupt(format!("id counter has {} bytes, expected 8", bytes.len())))?;
    Ok(u64::from_be_bytes(raw))
}
