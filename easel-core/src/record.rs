//! Durable representation of a canvas as held by a record store.

use serde::{Deserialize, Serialize};

use crate::CanvasId;

/// `{ id, objects, createdAt, updatedAt }` as persisted by a backend.
///
/// The editor only ever holds a transient copy. Timestamps are Unix
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRecord {
    pub id: CanvasId,
    #[serde(default)]
    pub objects: Vec<serde_json::Value>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CanvasRecord {
    pub fn new(id: CanvasId, objects: Vec<serde_json::Value>, now_ms: i64) -> Self {
        Self {
            id,
            objects,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    pub fn has_objects(&self) -> bool {
        !self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_camel_case_keys() {
        let record = CanvasRecord::new(CanvasId::parse("abc").unwrap(), vec![], 42);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["createdAt"], 42);
        assert_eq!(value["updatedAt"], 42);
        assert!(!record.has_objects());
    }

    #[test]
    fn test_missing_objects_default_to_empty() {
        let record: CanvasRecord =
            serde_json::from_str(r#"{"id":"abc","createdAt":1,"updatedAt":2}"#).unwrap();
        assert!(record.objects.is_empty());
    }
}
