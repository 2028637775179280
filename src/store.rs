//! Local key-value storage backing the persisted prompt state.
//!
//! Durability is whatever the backing store gives: the last write wins and nothing is atomic
//! across keys. [`InMemoryStore`] is useful in tests and for hosts that persist state themselves.
//! [`JsonFileStore`] keeps one JSON file per namespace, the way mobile preference files do.
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Namespace all prompt entries are stored under.
pub const NAMESPACE: &str = "RateThisApp";

/// A single typed preference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, From)]
#[serde(rename_all = "snake_case")]
pub enum StoredValue {
    /// 64-bit value, used for timestamps in epoch milliseconds.
    Long(i64),
    /// Non-negative counter.
    Int(u32),
    /// Flag.
    Bool(bool),
}

impl StoredValue {
    /// The value if it is a [`StoredValue::Long`].
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if it is a [`StoredValue::Int`].
    pub fn as_int(&self) -> Option<u32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The value if it is a [`StoredValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

/// Preference storage used to persist [`PromptState`](crate::PromptState).
///
/// Writes become durable on [`commit`](KeyValueStore::commit). Implementations are free to make
/// them visible to `get` before that.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<StoredValue>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: StoredValue);

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str);

    /// Flush pending writes to the backing medium.
    fn commit(&mut self) -> Result<()>;
}

/// In-memory [`KeyValueStore`].
///
/// Clones share the same entries, so a host (or a test) can keep a handle to inspect what the
/// client has written.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        InMemoryStore::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        // read() fails only if a writer panicked while holding the lock. Treat that as a missing
        // entry rather than crashing the host.
        let entries = self.entries.read().ok()?;
        entries.get(key).copied()
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_owned(), value);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// [`KeyValueStore`] persisted as `<dir>/<namespace>.json`.
///
/// The whole file is read on open and rewritten on every commit.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, StoredValue>,
}

impl JsonFileStore {
    /// Open the store for the default [`NAMESPACE`] inside `dir`.
    pub fn open_in(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir.as_ref().join(format!("{NAMESPACE}.json")))
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        log::debug!(target: "rate_prompt",
                    path:display = path.display(),
                    entries = entries.len();
                    "opened preference file");
        Ok(JsonFileStore { path, entries })
    }

    /// Location of the preference file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).copied()
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn commit(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write next to the target and rename over it, so a crash mid-write leaves the previous
        // file intact.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{InMemoryStore, JsonFileStore, KeyValueStore, StoredValue, NAMESPACE};
    use crate::Error;

    #[test]
    fn in_memory_clones_share_entries() {
        let store = InMemoryStore::new();
        let mut writer = store.clone();

        writer.put("launches", 3u32.into());
        assert_eq!(store.get("launches"), Some(StoredValue::Int(3)));

        writer.remove("launches");
        assert!(store.is_empty());
    }

    #[test]
    fn typed_accessors_reject_other_types() {
        let value = StoredValue::from(42i64);
        assert_eq!(value.as_long(), Some(42));
        assert_eq!(value.as_int(), None);
        assert_eq!(value.as_bool(), None);
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open_in(dir.path()).unwrap();

        assert_eq!(store.get("anything"), None);
        assert_eq!(store.path(), dir.path().join(format!("{NAMESPACE}.json")));
    }

    #[test]
    fn file_store_persists_on_commit() {
        let dir = TempDir::new().unwrap();

        let mut store = JsonFileStore::open_in(dir.path()).unwrap();
        store.put("install", StoredValue::Long(1_700_000_000_000));
        store.put("opt_out", true.into());
        store.commit().unwrap();

        let reopened = JsonFileStore::open_in(dir.path()).unwrap();
        assert_eq!(
            reopened.get("install"),
            Some(StoredValue::Long(1_700_000_000_000))
        );
        assert_eq!(reopened.get("opt_out"), Some(StoredValue::Bool(true)));
        assert!(!dir.path().join(format!("{NAMESPACE}.json.tmp")).exists());
    }

    #[test]
    fn file_store_creates_missing_parent_on_commit() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("prefs");

        let mut store = JsonFileStore::open_in(&nested).unwrap();
        store.put("launches", 2u32.into());
        store.commit().unwrap();

        assert_eq!(
            JsonFileStore::open_in(&nested).unwrap().get("launches"),
            Some(StoredValue::Int(2))
        );
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(format!("{NAMESPACE}.json")), "not json").unwrap();

        assert!(matches!(
            JsonFileStore::open_in(dir.path()),
            Err(Error::MalformedStore(_))
        ));
    }
}
