//! Local fallback store: canvas records kept as JSON strings in a
//! synchronous key/value storage, under the key `canvas_{id}`.

use anyhow::Context;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use easel_core::{CanvasId, CanvasRecord};

use super::{merged_record, RecordStore, StoreError};

/// Synchronous string key/value storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

/// Key/value storage held in memory. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Key/value storage as one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Escape anything outside `[A-Za-z0-9_-]` so a key maps to exactly one file name.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-' => stem.push(byte as char),
            other => stem.push_str(&format!("%{other:02X}")),
        }
    }
    stem
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read local item: {}", path.display())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        // fs::write does NOT create directories
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create local store dir: {}", self.dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("write local item: {}", path.display()))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove local item: {}", path.display())),
        }
    }
}

/// Record store over a [`KeyValueStore`]. Always configured; `update`
/// creates the record when it does not exist yet.
#[derive(Debug, Clone)]
pub struct LocalRecordStore<K> {
    kv: K,
}

impl<K: KeyValueStore> LocalRecordStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn key_for(id: &CanvasId) -> String {
        format!("canvas_{id}")
    }

    pub fn backing(&self) -> &K {
        &self.kv
    }

    fn write(&self, record: &CanvasRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record).map_err(StoreError::Encode)?;
        self.kv.set_item(&Self::key_for(&record.id), &json)?;
        Ok(())
    }
}

impl<K: KeyValueStore> RecordStore for LocalRecordStore<K> {
    fn get(&self, id: &CanvasId) -> Result<Option<CanvasRecord>, StoreError> {
        let Some(data) = self.kv.get_item(&Self::key_for(id))? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
            id: id.clone(),
            source,
        })?;
        Ok(Some(record))
    }

    fn put(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        merge: bool,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        let existing = if merge { self.get(id).ok().flatten() } else { None };
        self.write(&merged_record(existing, id, objects, merge, now_ms))
    }

    fn update(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        self.put(id, objects, true, now_ms)
    }
}
