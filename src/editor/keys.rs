//! Keyboard shortcuts.

use super::format_state::FormatCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    ArrowLeft,
    ArrowRight,
    Other,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            alt: false,
            shift: false,
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            ..Self::new(Key::Char(key))
        }
    }

    pub fn meta(key: char) -> Self {
        Self {
            meta: true,
            ..Self::new(Key::Char(key))
        }
    }

    pub fn alt(key: Key) -> Self {
        Self {
            alt: true,
            ..Self::new(key)
        }
    }
}

/// What a shortcut asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    NextSet,
    PreviousSet,
    Format(FormatCommand),
}

/// Map a chord to its shortcut, if it is one.
///
/// Alt+arrows flip page sets; Ctrl or Cmd with b, i or u toggles bold,
/// italic or underline.
pub fn shortcut(chord: &KeyChord) -> Option<KeyAction> {
    if chord.alt {
        match chord.key {
            Key::ArrowRight => return Some(KeyAction::NextSet),
            Key::ArrowLeft => return Some(KeyAction::PreviousSet),
            _ => {}
        }
    }
    if chord.ctrl || chord.meta {
        let Key::Char(c) = chord.key else {
            return None;
        };
        return match c.to_ascii_lowercase() {
            'b' => Some(KeyAction::Format(FormatCommand::Bold)),
            'i' => Some(KeyAction::Format(FormatCommand::Italic)),
            'u' => Some(KeyAction::Format(FormatCommand::Underline)),
            _ => None,
        };
    }
    None
}
