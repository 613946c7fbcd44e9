//! Persistence of the organization and election collections.
//!
//! Every collection lives as one JSON value under a fixed key and is always
//! replaced as a whole.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::{ResultExt, Snafu};

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum StorageKey {
    /// Array of organizations.
    Organizations,
    /// Array of elections.
    Elections,
    /// Single organization record.
    CurrentOrganization,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::Organizations,
        StorageKey::Elections,
        StorageKey::CurrentOrganization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Organizations => "organizations",
            StorageKey::Elections => "elections",
            StorageKey::CurrentOrganization => "currentOrganization",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Snafu)]
pub enum StoreError {
    #[snafu(display("Could not access storage key {key}"))]
    Io {
        key: StorageKey,
        source: std::io::Error,
    },
    #[snafu(display("Corrupted data under storage key {key}"))]
    Corrupted {
        key: StorageKey,
        source: serde_json::Error,
    },
    #[snafu(display("Could not serialize data for storage key {key}"))]
    Serializing {
        key: StorageKey,
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Raw access to the stored JSON values.
pub trait CollectionStore {
    fn read(&self, key: StorageKey) -> StoreResult<Option<String>>;
    fn write(&mut self, key: StorageKey, contents: &str) -> StoreResult<()>;
    fn remove(&mut self, key: StorageKey) -> StoreResult<()>;
}

/// Reads a collection. A missing key is an empty collection.
pub fn load_collection<T, S>(store: &S, key: StorageKey) -> StoreResult<Vec<T>>
where
    T: DeserializeOwned,
    S: CollectionStore + ?Sized,
{
    match store.read(key)? {
        Some(contents) => serde_json::from_str(&contents).context(CorruptedSnafu { key }),
        None => Ok(Vec::new()),
    }
}

pub fn save_collection<T, S>(store: &mut S, key: StorageKey, items: &[T]) -> StoreResult<()>
where
    T: Serialize,
    S: CollectionStore + ?Sized,
{
    let contents = serde_json::to_string(items).context(SerializingSnafu { key })?;
    info!("save_collection: {} records under {}", items.len(), key);
    store.write(key, &contents)
}

pub fn load_record<T, S>(store: &S, key: StorageKey) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: CollectionStore + ?Sized,
{
    match store.read(key)? {
        Some(contents) => serde_json::from_str(&contents)
            .map(Some)
            .context(CorruptedSnafu { key }),
        None => Ok(None),
    }
}

pub fn save_record<T, S>(store: &mut S, key: StorageKey, record: &T) -> StoreResult<()>
where
    T: Serialize,
    S: CollectionStore + ?Sized,
{
    let contents = serde_json::to_string(record).context(SerializingSnafu { key })?;
    store.write(key, &contents)
}

/// Keeps everything in memory. Useful for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<StorageKey, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl CollectionStore for MemoryStore {
    fn read(&self, key: StorageKey) -> StoreResult<Option<String>> {
        Ok(self.entries.get(&key).cloned())
    }

    fn write(&mut self, key: StorageKey, contents: &str) -> StoreResult<()> {
        self.entries.insert(key, contents.to_string());
        Ok(())
    }

    fn remove(&mut self, key: StorageKey) -> StoreResult<()> {
        self.entries.remove(&key);
        Ok(())
    }
}

/// One `<key>.json` file per storage key inside a directory.
///
/// Writes go to a temporary file first and are then renamed over the
/// previous value, so a key holds either the old or the new collection.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> FileStore {
        FileStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

impl CollectionStore for FileStore {
    fn read(&self, key: StorageKey) -> StoreResult<Option<String>> {
        let p = self.path(key);
        debug!("FileStore::read: {:?}", p);
        match fs::read_to_string(&p) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(IoSnafu { key }),
        }
    }

    fn write(&mut self, key: StorageKey, contents: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.root).context(IoSnafu { key })?;
        let p = self.path(key);
        let tmp = p.with_extension("json.tmp");
        debug!("FileStore::write: {:?}", p);
        fs::write(&tmp, contents).context(IoSnafu { key })?;
        fs::rename(&tmp, &p).context(IoSnafu { key })
    }

    fn remove(&mut self, key: StorageKey) -> StoreResult<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context(IoSnafu { key }),
        }
    }
}
