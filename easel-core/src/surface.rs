//! The narrow interface the editor consumes from a scene surface.

use thiserror::Error;

use crate::{ObjectId, Snapshot};

/// Notifications fired by a surface, drained by the editor in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    ObjectAdded(Option<ObjectId>),
    ObjectRemoved(Option<ObjectId>),
    ObjectModified(Option<ObjectId>),
    /// A load started with [`SceneSurface::load`] has been applied.
    LoadCompleted,
}

impl SceneEvent {
    /// Added, removed or modified: the events that feed history and autosave.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, SceneEvent::LoadCompleted)
    }
}

/// A retained-mode scene that can be serialized and reloaded wholesale.
///
/// Loading is asynchronous: `load` only starts the work, and the surface
/// later emits [`SceneEvent::LoadCompleted`] once the new content is in
/// place. Mutations made while loading are reported like any other.
pub trait SceneSurface {
    /// Serialize the entire scene.
    fn serialize(&self) -> Result<Snapshot, SceneError>;

    /// The object list as opaque descriptors, in paint order.
    fn objects(&self) -> Result<Vec<serde_json::Value>, SceneError>;

    /// Begin replacing the scene with `snapshot`.
    fn load(&mut self, snapshot: &Snapshot) -> Result<(), SceneError>;

    fn render(&mut self);

    /// Take every event fired since the last drain.
    fn drain_events(&mut self) -> Vec<SceneEvent>;
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("failed to encode scene: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode scene: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("no object with id {0}")]
    UnknownObject(ObjectId),
}
