//! Keyboard shortcuts
//!
//! Space toggles playback, the arrow keys skip. Shortcuts are suppressed while a text
//! input (the queue search box) has focus so typing a space does not pause the music.

use crate::types::Command;
use std::str::FromStr;

/// Keys with a playback binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutKey {
    /// Space bar
    Space,
    /// Right arrow
    ArrowRight,
    /// Left arrow
    ArrowLeft,
}

impl FromStr for ShortcutKey {
    type Err = ();

    /// Parse a physical key code such as `"Space"` or `"ArrowLeft"`
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "Space" | " " => Ok(Self::Space),
            "ArrowRight" => Ok(Self::ArrowRight),
            "ArrowLeft" => Ok(Self::ArrowLeft),
            _ => Err(()),
        }
    }
}

impl ShortcutKey {
    /// Command bound to this key
    pub fn command(self) -> Command {
        match self {
            Self::Space => Command::TogglePlayPause,
            Self::ArrowRight => Command::Next,
            Self::ArrowLeft => Command::Previous,
        }
    }
}

/// Command for a key press, if any
///
/// Returns `None` for unbound keys and for every key while a text input has focus.
pub fn command_for_key(code: &str, text_input_focused: bool) -> Option<Command> {
    if text_input_focused {
        return None;
    }
    code.parse::<ShortcutKey>().ok().map(ShortcutKey::command)
}
