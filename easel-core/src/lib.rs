//! easel-core: scene model shared by the editor and its persistence layer.
//!
//! Design rules:
//! - A scene is a flat, ordered list of objects (paint order).
//! - Snapshots are whole-scene JSON documents, immutable once taken.
//! - Persisted records carry objects as opaque JSON descriptors; only the
//!   editor decodes them into shapes.
//! - Surfaces load asynchronously and report completion as an event.

pub mod config;
pub mod document;
pub mod id;
pub mod record;
pub mod shape;
pub mod surface;
pub mod template;

pub use config::{CanvasConfig, ConfigError, EditorConfig, RemoteConfig};
pub use document::{SceneDocument, Snapshot, SCENE_FORMAT_VERSION};
pub use id::{CanvasId, ObjectId};
pub use record::CanvasRecord;
pub use shape::{Font, FontWeight, Shape, ShapeKind, Style, TextAlign};
pub use surface::{SceneError, SceneEvent, SceneSurface};
pub use template::Template;
