//! Record stores: the remote document store the editor prefers, and the
//! local key/value-backed store it falls back to.
//!
//! Stores are synchronous from the editor's point of view. A client for a
//! networked backend must bound its own request time; nothing upstream
//! imposes a timeout.

mod local;
mod memory;

pub use local::{FileKeyValueStore, KeyValueStore, LocalRecordStore, MemoryKeyValueStore};
pub use memory::MemoryRecordStore;

use easel_core::{CanvasId, CanvasRecord};
use thiserror::Error;

/// Durable storage of canvas records keyed by canvas id.
pub trait RecordStore {
    /// False when the store has no usable credentials (demo mode).
    fn is_configured(&self) -> bool {
        true
    }

    fn get(&self, id: &CanvasId) -> Result<Option<CanvasRecord>, StoreError>;

    /// Write the object list. With `merge`, an existing record keeps its
    /// `createdAt`; without, the record is replaced wholesale.
    fn put(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        merge: bool,
        now_ms: i64,
    ) -> Result<(), StoreError>;

    /// Replace the object list of an existing record.
    fn update(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        now_ms: i64,
    ) -> Result<(), StoreError>;
}

impl<T: RecordStore + ?Sized> RecordStore for Box<T> {
    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    fn get(&self, id: &CanvasId) -> Result<Option<CanvasRecord>, StoreError> {
        (**self).get(id)
    }

    fn put(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        merge: bool,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        (**self).put(id, objects, merge, now_ms)
    }

    fn update(
        &self,
        id: &CanvasId,
        objects: Vec<serde_json::Value>,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        (**self).update(id, objects, now_ms)
    }
}

/// Merge `objects` into `existing` per the `put` contract.
pub(crate) fn merged_record(
    existing: Option<CanvasRecord>,
    id: &CanvasId,
    objects: Vec<serde_json::Value>,
    merge: bool,
    now_ms: i64,
) -> CanvasRecord {
    match existing {
        Some(mut record) if merge => {
            record.objects = objects;
            record.updated_at = now_ms;
            record
        }
        _ => CanvasRecord::new(id.clone(), objects, now_ms),
    }
}

/// Store failures. Every variant is treated the same by the pipeline
/// (fall back to the local store); the split exists for logging.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record for canvas {0}")]
    NotFound(CanvasId),

    #[error("record store is not configured")]
    NotConfigured,

    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record for canvas {id}: {source}")]
    Corrupt {
        id: CanvasId,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> CanvasId {
        CanvasId::parse("abc").unwrap()
    }

    #[test]
    fn test_merge_keeps_created_at() {
        let existing = CanvasRecord::new(id(), vec![], 10);
        let record = merged_record(Some(existing), &id(), vec![serde_json::json!(1)], true, 20);
        assert_eq!(record.created_at, 10);
        assert_eq!(record.updated_at, 20);
        assert_eq!(record.objects.len(), 1);
    }

    #[test]
    fn test_overwrite_resets_created_at() {
        let existing = CanvasRecord::new(id(), vec![], 10);
        let record = merged_record(Some(existing), &id(), vec![], false, 20);
        assert_eq!(record.created_at, 20);
    }
}
