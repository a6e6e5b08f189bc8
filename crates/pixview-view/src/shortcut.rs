//! Shortcut bindings and matching.
//!
//! A [`Shortcut`] pairs a primary [`Input`] with an optional modifier list and
//! a [`ModifierMatching`] strictness. [`ShortcutTable`] holds one binding per
//! [`ShortcutAction`]; every binding is plain data, so a host can replace any
//! of them (or the whole table, see [`crate::ViewportConfig`]).
//!
//! # Matching rules
//!
//! - The primary input must be equal, character keys compared case-insensitively.
//! - `modifiers: None` ignores modifiers entirely.
//! - `modifiers: Some(list)`:
//!   - [`ModifierMatching::Exact`]: held modifiers equal the set of `list`
//!   - [`ModifierMatching::ContainsAll`]: every listed modifier is held
//!   - [`ModifierMatching::ContainsAny`]: at least one listed modifier is held
//!
//! ```rust
//! use pixview_view::{InputEvent, Key, Modifiers, ShortcutAction, ShortcutTable};
//!
//! let table = ShortcutTable::default();
//! let home = InputEvent::KeyPress { key: Key::Home, modifiers: Modifiers::NONE };
//! assert_eq!(table.lookup_first(&home), Some(ShortcutAction::ResetZoom));
//!
//! // exact binding with no modifiers rejects a held Shift
//! let shifted = InputEvent::KeyPress { key: Key::Home, modifiers: Modifiers::SHIFT };
//! assert_eq!(table.lookup_first(&shifted), None);
//! ```

use serde::{Deserialize, Serialize};

use crate::event::{Input, InputEvent, Key, Modifier, Modifiers, PointerButton};

/// How strictly a binding's modifiers are compared with the held ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierMatching {
    /// Held set must equal the listed set.
    #[default]
    Exact,
    /// Every listed modifier must be held; extras allowed.
    ContainsAll,
    /// At least one listed modifier must be held.
    ContainsAny,
}

/// A key or button plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortcut {
    /// Primary input
    pub input: Input,
    /// Modifiers to check, `None` to ignore modifiers.
    pub modifiers: Option<Vec<Modifier>>,
    /// Strictness of the modifier check
    #[serde(default)]
    pub matching: ModifierMatching,
}

impl Shortcut {
    /// Binding with an exact modifier set.
    pub fn new(input: Input, modifiers: &[Modifier]) -> Self {
        Self {
            input,
            modifiers: Some(modifiers.to_vec()),
            matching: ModifierMatching::Exact,
        }
    }

    /// Binding that ignores modifiers.
    pub fn any_modifiers(input: Input) -> Self {
        Self {
            input,
            modifiers: None,
            matching: ModifierMatching::Exact,
        }
    }

    /// Keyboard binding with an exact modifier set.
    pub fn key(key: Key, modifiers: &[Modifier]) -> Self {
        Self::new(Input::Key(key), modifiers)
    }

    /// Pointer button binding with an exact modifier set.
    pub fn button(button: PointerButton, modifiers: &[Modifier]) -> Self {
        Self::new(Input::Button(button), modifiers)
    }

    /// Copy using `matching` instead of the current strictness.
    #[must_use]
    pub fn with_matching(mut self, matching: ModifierMatching) -> Self {
        self.matching = matching;
        self
    }

    /// `true` if `event` triggers this binding.
    pub fn matches(&self, event: &InputEvent) -> bool {
        self.matches_with(event, self.matching)
    }

    /// Like [`Shortcut::matches`] but with an explicit strictness.
    pub fn matches_with(&self, event: &InputEvent, matching: ModifierMatching) -> bool {
        let Some(input) = event.input() else {
            return false;
        };
        if input.folded() != self.input.folded() {
            return false;
        }
        let Some(listed) = &self.modifiers else {
            return true;
        };

        let held = event.modifiers();
        match matching {
            ModifierMatching::Exact => held == Modifiers::from_slice(listed),
            ModifierMatching::ContainsAll => listed.iter().all(|&m| held.contains(m)),
            ModifierMatching::ContainsAny => listed.iter().any(|&m| held.contains(m)),
        }
    }
}

/// Logical actions, in the table's declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    /// Back to zoom 1.0 around the cursor
    ResetZoom,
    /// Pan while held (first binding)
    PanPrimary,
    /// Pan while held (second binding)
    PanSecondary,
    /// Drag-zoom while held
    ZoomSecondary,
    /// Pick a single pixel
    Pick,
    /// Start an area pick
    PickAreaStart,
    /// Grow the area pick under the pointer
    PickAreaExpand,
    /// Hide the color picker
    Unpick,
    /// Show the coordinate grid (first chord)
    ShowCoordinatesA,
    /// Show the coordinate grid (second chord)
    ShowCoordinatesB,
    /// Rotate the image 90 degrees clockwise
    RotateCw,
    /// Rotate the image 90 degrees counter-clockwise
    RotateCcw,
    /// Clear the image
    Clear,
    /// Recenter on the image
    ResetPan,
    /// Cycle background styles
    ChangeBackground,
}

impl ShortcutAction {
    /// `true` for actions consumed by navigation and viewport commands, which
    /// stop the event from reaching overlays.
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::ResetZoom
                | Self::PanPrimary
                | Self::PanSecondary
                | Self::ZoomSecondary
                | Self::RotateCw
                | Self::RotateCcw
                | Self::Clear
                | Self::ResetPan
                | Self::ChangeBackground
        )
    }
}

/// One binding per [`ShortcutAction`].
///
/// Lookup walks the fields in declaration order and returns the first match;
/// overlapping bindings are resolved by that order, never reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutTable {
    /// See [`ShortcutAction::ResetZoom`]
    pub reset_zoom: Shortcut,
    /// See [`ShortcutAction::PanPrimary`]
    pub pan_primary: Shortcut,
    /// See [`ShortcutAction::PanSecondary`]
    pub pan_secondary: Shortcut,
    /// See [`ShortcutAction::ZoomSecondary`]
    pub zoom_secondary: Shortcut,
    /// See [`ShortcutAction::Pick`]
    pub pick: Shortcut,
    /// See [`ShortcutAction::PickAreaStart`]
    pub pick_area_start: Shortcut,
    /// See [`ShortcutAction::PickAreaExpand`]
    pub pick_area_expand: Shortcut,
    /// See [`ShortcutAction::Unpick`]
    pub unpick: Shortcut,
    /// See [`ShortcutAction::ShowCoordinatesA`]
    pub show_coordinates_a: Shortcut,
    /// See [`ShortcutAction::ShowCoordinatesB`]
    pub show_coordinates_b: Shortcut,
    /// See [`ShortcutAction::RotateCw`]
    pub rotate_cw: Shortcut,
    /// See [`ShortcutAction::RotateCcw`]
    pub rotate_ccw: Shortcut,
    /// See [`ShortcutAction::Clear`]
    pub clear: Shortcut,
    /// See [`ShortcutAction::ResetPan`]
    pub reset_pan: Shortcut,
    /// See [`ShortcutAction::ChangeBackground`]
    pub change_background: Shortcut,
}

impl Default for ShortcutTable {
    fn default() -> Self {
        use Modifier::{Alt, Control, Shift};
        use PointerButton::{Middle, Primary, Secondary};

        Self {
            reset_zoom: Shortcut::key(Key::Home, &[]),
            pan_primary: Shortcut::button(Primary, &[Alt])
                .with_matching(ModifierMatching::ContainsAll),
            pan_secondary: Shortcut::button(Middle, &[]),
            zoom_secondary: Shortcut::button(Middle, &[Alt])
                .with_matching(ModifierMatching::ContainsAll),
            pick: Shortcut::button(Primary, &[Control]),
            pick_area_start: Shortcut::button(Primary, &[Control, Shift]),
            pick_area_expand: Shortcut::new(Input::NoButton, &[Control, Shift]),
            unpick: Shortcut::button(Secondary, &[Control]),
            show_coordinates_a: Shortcut::key(Key::Alt, &[Shift, Alt]),
            show_coordinates_b: Shortcut::key(Key::Shift, &[Alt, Shift]),
            rotate_cw: Shortcut::key(Key::Char('E'), &[]),
            rotate_ccw: Shortcut::key(Key::Char('Q'), &[]),
            clear: Shortcut::key(Key::Delete, &[]),
            reset_pan: Shortcut::key(Key::Char('F'), &[]),
            change_background: Shortcut::key(Key::Char('B'), &[]),
        }
    }
}

impl ShortcutTable {
    /// Bindings in declaration order.
    pub fn entries(&self) -> [(ShortcutAction, &Shortcut); 15] {
        use ShortcutAction as A;
        [
            (A::ResetZoom, &self.reset_zoom),
            (A::PanPrimary, &self.pan_primary),
            (A::PanSecondary, &self.pan_secondary),
            (A::ZoomSecondary, &self.zoom_secondary),
            (A::Pick, &self.pick),
            (A::PickAreaStart, &self.pick_area_start),
            (A::PickAreaExpand, &self.pick_area_expand),
            (A::Unpick, &self.unpick),
            (A::ShowCoordinatesA, &self.show_coordinates_a),
            (A::ShowCoordinatesB, &self.show_coordinates_b),
            (A::RotateCw, &self.rotate_cw),
            (A::RotateCcw, &self.rotate_ccw),
            (A::Clear, &self.clear),
            (A::ResetPan, &self.reset_pan),
            (A::ChangeBackground, &self.change_background),
        ]
    }

    /// Binding for `action`.
    pub fn get(&self, action: ShortcutAction) -> &Shortcut {
        use ShortcutAction as A;
        match action {
            A::ResetZoom => &self.reset_zoom,
            A::PanPrimary => &self.pan_primary,
            A::PanSecondary => &self.pan_secondary,
            A::ZoomSecondary => &self.zoom_secondary,
            A::Pick => &self.pick,
            A::PickAreaStart => &self.pick_area_start,
            A::PickAreaExpand => &self.pick_area_expand,
            A::Unpick => &self.unpick,
            A::ShowCoordinatesA => &self.show_coordinates_a,
            A::ShowCoordinatesB => &self.show_coordinates_b,
            A::RotateCw => &self.rotate_cw,
            A::RotateCcw => &self.rotate_ccw,
            A::Clear => &self.clear,
            A::ResetPan => &self.reset_pan,
            A::ChangeBackground => &self.change_background,
        }
    }

    /// First action whose binding matches `event`, in declaration order.
    pub fn lookup_first(&self, event: &InputEvent) -> Option<ShortcutAction> {
        self.entries()
            .into_iter()
            .find(|(_, shortcut)| shortcut.matches(event))
            .map(|(action, _)| action)
    }

    /// `true` if `event` matches the binding of `action`.
    pub fn matches(&self, action: ShortcutAction, event: &InputEvent) -> bool {
        self.get(action).matches(event)
    }
}
