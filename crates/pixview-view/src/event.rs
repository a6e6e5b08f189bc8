//! Input events fed into the viewport.
//!
//! The host translates its toolkit events into [`InputEvent`] values; every
//! position is in device pixels relative to the viewport's top-left corner.
//! Shortcut matching only looks at the event's primary [`Input`] and its
//! [`Modifiers`].
//!
//! | Event | Primary input |
//! |-------|---------------|
//! | `KeyPress` / `KeyRelease` | [`Input::Key`] |
//! | `PointerPress` / `PointerRelease` | [`Input::Button`] |
//! | `PointerMove` | [`Input::NoButton`] |
//! | `Scroll` | none, never matches a binding |
//! | `ShortcutProbe` | the probed input |

use pixview_math::DVec2;
use serde::{Deserialize, Serialize};

/// Keyboard key.
///
/// Letters are stored uppercase; use [`Key::char`] to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Home
    Home,
    /// End
    End,
    /// Delete
    Delete,
    /// Backspace
    Backspace,
    /// Escape
    Escape,
    /// Enter / Return
    Enter,
    /// Space bar
    Space,
    /// Tab
    Tab,
    /// Alt / Option, as a key on its own
    Alt,
    /// Shift, as a key on its own
    Shift,
    /// Control, as a key on its own
    Control,
    /// Meta / Command / Super, as a key on its own
    Meta,
    /// Function key F1..F24
    Function(u8),
    /// Printable character (letters uppercase)
    Char(char),
}

impl Key {
    /// Character key, letters folded to uppercase.
    pub fn char(c: char) -> Self {
        Self::Char(c.to_ascii_uppercase())
    }

    /// Same key with a character folded to uppercase.
    pub fn folded(self) -> Self {
        match self {
            Self::Char(c) => Self::char(c),
            other => other,
        }
    }

    /// The modifier a modifier key toggles, if any.
    pub fn as_modifier(self) -> Option<Modifier> {
        match self {
            Self::Alt => Some(Modifier::Alt),
            Self::Shift => Some(Modifier::Shift),
            Self::Control => Some(Modifier::Control),
            Self::Meta => Some(Modifier::Meta),
            _ => None,
        }
    }
}

/// A single keyboard modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Alt / Option
    Alt,
    /// Control
    Control,
    /// Shift
    Shift,
    /// Meta / Command / Super
    Meta,
}

/// Set of active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Alt / Option held
    pub alt: bool,
    /// Control held
    pub ctrl: bool,
    /// Shift held
    pub shift: bool,
    /// Meta / Command held
    pub meta: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        alt: false,
        ctrl: false,
        shift: false,
        meta: false,
    };
    /// Only Alt.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    /// Only Control.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    /// Only Shift.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Set built from a list of modifiers.
    pub fn from_slice(mods: &[Modifier]) -> Self {
        mods.iter().fold(Self::NONE, |acc, &m| acc.with(m))
    }

    /// Copy with `m` added.
    #[must_use]
    pub const fn with(mut self, m: Modifier) -> Self {
        match m {
            Modifier::Alt => self.alt = true,
            Modifier::Control => self.ctrl = true,
            Modifier::Shift => self.shift = true,
            Modifier::Meta => self.meta = true,
        }
        self
    }

    /// Copy with `m` removed.
    #[must_use]
    pub const fn without(mut self, m: Modifier) -> Self {
        match m {
            Modifier::Alt => self.alt = false,
            Modifier::Control => self.ctrl = false,
            Modifier::Shift => self.shift = false,
            Modifier::Meta => self.meta = false,
        }
        self
    }

    /// `true` if `m` is held.
    pub const fn contains(&self, m: Modifier) -> bool {
        match m {
            Modifier::Alt => self.alt,
            Modifier::Control => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Meta => self.meta,
        }
    }

    /// `true` if nothing is held.
    pub const fn is_empty(&self) -> bool {
        !(self.alt || self.ctrl || self.shift || self.meta)
    }
}

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left button
    Primary,
    /// Right button
    Secondary,
    /// Wheel button
    Middle,
}

/// Primary input of an event or a binding: a key, a button, or no button at
/// all (pointer motion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    /// Keyboard key
    Key(Key),
    /// Pointer button
    Button(PointerButton),
    /// Pointer motion
    NoButton,
}

impl Input {
    /// Case-insensitive form used for matching.
    pub fn folded(self) -> Self {
        match self {
            Self::Key(key) => Self::Key(key.folded()),
            other => other,
        }
    }
}

/// An input event, positions in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key went down.
    KeyPress {
        /// Key
        key: Key,
        /// Modifiers held, including the key itself if it is a modifier
        modifiers: Modifiers,
    },
    /// Key went up.
    KeyRelease {
        /// Key
        key: Key,
        /// Modifiers held just before the release
        modifiers: Modifiers,
    },
    /// Pointer button went down.
    PointerPress {
        /// Button
        button: PointerButton,
        /// Pointer position
        pos: DVec2,
        /// Modifiers held
        modifiers: Modifiers,
    },
    /// Pointer moved.
    PointerMove {
        /// Pointer position
        pos: DVec2,
        /// Modifiers held
        modifiers: Modifiers,
    },
    /// Pointer button went up.
    PointerRelease {
        /// Button
        button: PointerButton,
        /// Pointer position
        pos: DVec2,
        /// Modifiers held
        modifiers: Modifiers,
    },
    /// Wheel rotation. One notch is 120 units, positive away from the user.
    Scroll {
        /// Wheel delta
        delta: f64,
        /// Pointer position
        pos: DVec2,
        /// Modifiers held
        modifiers: Modifiers,
    },
    /// The host asks whether the viewport claims this input before treating it
    /// as an application-wide shortcut.
    ShortcutProbe {
        /// Probed input
        input: Input,
        /// Modifiers held
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Primary input used for shortcut matching, `None` for scrolls.
    pub fn input(&self) -> Option<Input> {
        match *self {
            Self::KeyPress { key, .. } | Self::KeyRelease { key, .. } => Some(Input::Key(key)),
            Self::PointerPress { button, .. } | Self::PointerRelease { button, .. } => {
                Some(Input::Button(button))
            }
            Self::PointerMove { .. } => Some(Input::NoButton),
            Self::Scroll { .. } => None,
            Self::ShortcutProbe { input, .. } => Some(input),
        }
    }

    /// Modifiers held when the event fired.
    pub fn modifiers(&self) -> Modifiers {
        match *self {
            Self::KeyPress { modifiers, .. }
            | Self::KeyRelease { modifiers, .. }
            | Self::PointerPress { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerRelease { modifiers, .. }
            | Self::Scroll { modifiers, .. }
            | Self::ShortcutProbe { modifiers, .. } => modifiers,
        }
    }

    /// Pointer position, for pointer and scroll events.
    pub fn pos(&self) -> Option<DVec2> {
        match *self {
            Self::PointerPress { pos, .. }
            | Self::PointerMove { pos, .. }
            | Self::PointerRelease { pos, .. }
            | Self::Scroll { pos, .. } => Some(pos),
            _ => None,
        }
    }

    /// `true` for key and button presses (and probes of them).
    pub fn is_press(&self) -> bool {
        matches!(
            self,
            Self::KeyPress { .. } | Self::PointerPress { .. } | Self::ShortcutProbe { .. }
        )
    }
}
