// Editor module for Easel.

pub mod canvas;
pub mod history;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use canvas::Canvas;
pub use history::{History, ReplayEvent, ReplayState};
pub use session::{BootstrapSource, Editor, EditorDeps, EditorError};
pub use shortcuts::{KeyChord, ShortcutAction};
pub use tools::{Brush, CircleTool, RectangleTool, TextTool, Tool, ToolKind};
