//! Identifiers for canvases and the objects placed on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Key of a canvas: the `/canvas/:id` route parameter and the record key.
///
/// Client generated for new canvases, never mutated afterwards. Any
/// non-empty string is accepted so links shared from older clients keep
/// working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasId(String);

impl CanvasId {
    /// Generate a fresh identity for a new editor session.
    pub fn generate() -> Self {
        CanvasId(Uuid::new_v4().to_string())
    }

    /// Wrap an existing key. Returns `None` for empty or blank keys.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(CanvasId(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanvasId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identity of a single object inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        ObjectId(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
