//! In-memory document store standing in for the remote backend.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use easel_core::{CanvasId, CanvasRecord};

use super::{merged_record, RecordStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<CanvasId, CanvasRecord>,
    configured: bool,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// Remote-like store held in memory. Clones share the same records, so a
/// test can keep one handle and give another to the editor.
#[derive(Debug, Clone)]
pub struct MemoryRecordStore {
    inner: Rc<RefCell<Inner>>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                configured: true,
                ..Inner::default()
            })),
        }
    }

    /// A store that reports itself unconfigured (demo mode).
    pub fn unconfigured() -> Self {
        let store = Self::new();
        store.inner.borrow_mut().configured = false;
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.borrow_mut().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }

    /// Seed a record directly, bypassing write accounting.
    pub fn insert(&self, record: CanvasRecord) {
        self.inner
            .borrow_mut()
            .records
            .insert(record.id.clone(), record);
    }

    pub fn record(&self, id: &CanvasId) -> Option<CanvasRecord> {
        self.inner.borrow().records.get(id).cloned()
    }

    /// Number of successful `put`/`update` calls.
    pub fn write_count(&self) -> usize {
        self.inner.borrow().writes
    }

    fn check_write(&self) -> Result<(), StoreError> {
        let inner = self.inner.borrow();
        if !inner.configured {
            return Err(StoreError::NotConfigured);
        }
        if inner.fail_writes {
            return Err(StoreError::Unavailable("write rejected".into()));
        }
        Ok(())
    }
}

impl RecordStore for MemoryRecordStore {
    fn is_configured(&self) -> bool {
        self.inner.borrow().configured
    }

    fn get(&self, id: &CanvasId) -> Result<Option<CanvasRecord>, StoreError> {
        let inner = self.inner.borrow();
        if !inner.configured {
            return Err(StoreError::NotConfigured);
        }
        if inner.fail_reads {
            return Err(StoreError::Unavailable("read rejected".into()));
        }
        Ok(inner.records.get(id).cloned())
    }

    fn put(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        merge: bool,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut inner = self.inner.borrow_mut();
        let existing = inner.records.remove(id);
        let record = merged_record(existing, id, objects, merge, now_ms);
        inner.records.insert(id.clone(), record);
        inner.writes += 1;
        Ok(())
    }

    fn update(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        self.check_write()?;
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        record.objects = objects;
        record.updated_at = now_ms;
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id() -> CanvasId {
        CanvasId::parse("abc").unwrap()
    }

    #[test]
    fn test_update_requires_existing_record() {
        let store = MemoryRecordStore::new();
        let err = store.update(&id(), vec![json!({})], 1).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        store.put(&id(), vec![], true, 1).unwrap();
        store.update(&id(), vec![json!({"a": 1})], 2).unwrap();
        let record = store.get(&id()).unwrap().unwrap();
        assert_eq!(record.objects.len(), 1);
        assert_eq!((record.created_at, record.updated_at), (1, 2));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_clones_share_records() {
        let store = MemoryRecordStore::new();
        let handle = store.clone();
        store.put(&id(), vec![], false, 5).unwrap();
        assert!(handle.record(&id()).is_some());
    }

    #[test]
    fn test_failure_injection() {
        let store = MemoryRecordStore::new();
        store.set_fail_reads(true);
        assert!(matches!(
            store.get(&id()),
            Err(StoreError::Unavailable(_))
        ));
        store.set_fail_writes(true);
        assert!(store.put(&id(), vec![], true, 1).is_err());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_unconfigured_store_refuses_everything() {
        let store = MemoryRecordStore::unconfigured();
        assert!(!store.is_configured());
        assert!(matches!(store.get(&id()), Err(StoreError::NotConfigured)));
    }
}
