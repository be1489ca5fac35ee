// Keyboard shortcuts for the editor.

/// A key press with its modifier state, as reported by the host window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
}

/// Ctrl/Cmd+Z undoes; Ctrl/Cmd+Y and Ctrl/Cmd+Shift+Z redo.
pub fn shortcut_for(chord: &KeyChord) -> Option<ShortcutAction> {
    if !(chord.ctrl || chord.meta) {
        return None;
    }
    match chord.key.to_ascii_lowercase().as_str() {
        "z" if chord.shift => Some(ShortcutAction::Redo),
        "z" => Some(ShortcutAction::Undo),
        "y" => Some(ShortcutAction::Redo),
        _ => None,
    }
}
