use std::fmt;

use glam::Vec2;

/// Keyboard key identifier.
///
/// Keys without a variant map to `Key::Unknown(code)` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Transition of a key or mouse button.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    Press,
    /// Key held long enough for the platform to auto-repeat.
    Repeat,
    Release,
}

impl Action {
    /// True for `Press` and `Repeat`.
    #[inline]
    pub fn is_down(self) -> bool {
        !matches!(self, Action::Release)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Modifier keys held during an event.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Scroll amount. Line deltas count wheel notches; pixel deltas come from
/// touchpads and are in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScrollDelta {
    Lines(Vec2),
    Pixels(Vec2),
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        action: Action,
        /// Stable platform code when available (scancode).
        code: u32,
        modifiers: Modifiers,
    },

    MouseButton {
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
    },

    /// Cursor position in logical pixels, origin at the top-left corner.
    CursorMoved(Vec2),

    CursorLeft,

    Scroll(ScrollDelta),

    /// Committed text.
    Text(String),

    ModifiersChanged(Modifiers),

    Focused(bool),
}
