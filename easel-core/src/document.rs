//! Whole-scene documents and the immutable snapshots taken of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::{SceneError, Shape};

/// Document format version written into every snapshot.
pub const SCENE_FORMAT_VERSION: &str = "1";

/// Serializable state of an entire canvas at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub objects: Vec<Shape>,
}

fn default_version() -> String {
    SCENE_FORMAT_VERSION.to_string()
}

fn default_background() -> String {
    "white".into()
}

impl SceneDocument {
    pub fn new(background: impl Into<String>, objects: Vec<Shape>) -> Self {
        Self {
            version: default_version(),
            background: background.into(),
            objects,
        }
    }

    pub fn empty(background: impl Into<String>) -> Self {
        Self::new(background, Vec::new())
    }

    /// Build a document from the opaque object descriptors of a persisted record.
    pub fn from_descriptors(
        background: impl Into<String>,
        descriptors: &[serde_json::Value],
    ) -> Result<Self, SceneError> {
        let objects = descriptors
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Shape>, _>>()
            .map_err(SceneError::Decode)?;
        Ok(Self::new(background, objects))
    }

    /// The object list as opaque descriptors, in paint order.
    pub fn descriptors(&self) -> Result<Vec<serde_json::Value>, SceneError> {
        self.objects
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(SceneError::Encode)
    }

    pub fn to_snapshot(&self) -> Result<Snapshot, SceneError> {
        let json = serde_json::to_string(self).map_err(SceneError::Encode)?;
        Ok(Snapshot(Arc::from(json)))
    }
}

/// Serialized full-scene state captured at one point in time.
///
/// Immutable once captured; cloning shares the underlying buffer. Snapshots
/// are never compared for equality by the history engine.
#[derive(Clone)]
pub struct Snapshot(Arc<str>);

impl Snapshot {
    /// Wrap serialized text produced elsewhere. Validity is checked on decode.
    pub fn from_json(json: impl Into<String>) -> Self {
        Snapshot(Arc::from(json.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn decode(&self) -> Result<SceneDocument, SceneError> {
        serde_json::from_str(&self.0).map_err(SceneError::Decode)
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot").field("bytes", &self.0.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Style;

    #[test]
    fn test_snapshot_decodes_to_same_document() {
        let doc = SceneDocument::new(
            "white",
            vec![Shape::circle(100.0, 100.0, 50.0, Style::filled("#e74c3c"))],
        );
        let snapshot = doc.to_snapshot().unwrap();
        assert_eq!(snapshot.decode().unwrap(), doc);
    }

    #[test]
    fn test_garbage_snapshot_fails_decode() {
        let snapshot = Snapshot::from_json("{not json");
        assert!(matches!(snapshot.decode(), Err(SceneError::Decode(_))));
    }

    #[test]
    fn test_bad_descriptor_fails_whole_document() {
        let descriptors = vec![
            serde_json::json!({"type": "circle", "radius": 5, "left": 0, "top": 0}),
            serde_json::json!({"type": "blob"}),
        ];
        assert!(SceneDocument::from_descriptors("white", &descriptors).is_err());
    }
}
