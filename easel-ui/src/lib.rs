//! easel-ui: the headless editor.
//!
//! Hosts feed it input (toolbar actions, key chords, strokes) and call
//! [`Editor::tick`] on every frame; rendering of the [`Canvas`] is theirs.

pub mod editor;
pub mod export;
pub mod logging;
pub mod route;

pub use editor::{
    BootstrapSource, Canvas, Editor, EditorDeps, EditorError, History, KeyChord, ReplayState,
    ToolKind,
};
pub use route::{new_blank_canvas, new_from_template, Route, RouteError, ShareLinks};
