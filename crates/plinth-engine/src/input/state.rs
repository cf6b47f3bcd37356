use std::collections::HashSet;

use glam::Vec2;

use super::types::{InputEvent, Key, Modifiers, MouseButton};

/// Held keys and buttons, cursor position and modifiers for one window.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Logical pixels; `None` while the cursor is outside the window.
    pub cursor: Option<Vec2>,

    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key { key, action, modifiers, .. } => {
                self.modifiers = *modifiers;
                if action.is_down() {
                    self.keys_down.insert(*key);
                } else {
                    self.keys_down.remove(key);
                }
            }

            InputEvent::MouseButton { button, action, modifiers } => {
                self.modifiers = *modifiers;
                if action.is_down() {
                    self.buttons_down.insert(*button);
                } else {
                    self.buttons_down.remove(button);
                }
            }

            InputEvent::CursorMoved(pos) => self.cursor = Some(*pos),
            InputEvent::CursorLeft => self.cursor = None,
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(focused) => {
                self.focused = *focused;
                // Releases are not delivered while unfocused.
                if !focused {
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::Scroll(_) | InputEvent::Text(_) => {}
        }
    }

    #[inline]
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
