//! Keyboard shortcuts.
//!
//! The only binding is the pause toggle. Physical key codes are used so it
//! sits in the same place regardless of keyboard layout.

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys that pause or resume the animation.
pub const PAUSE_KEYS: [KeyCode; 2] = [KeyCode::Space, KeyCode::KeyP];

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// True for a fresh press of a pause key. Repeats and releases are ignored
/// so holding the key toggles once.
pub fn is_pause_toggle(event: RawKeyEvent) -> bool {
    if event.repeat || event.state != ElementState::Pressed {
        return false;
    }
    matches!(event.key, PhysicalKey::Code(code) if PAUSE_KEYS.contains(&code))
}
