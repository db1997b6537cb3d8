use crate::action::Action;
use glam::{Vec2, Vec3};

/// Camera displacement of one key press.
pub const NUDGE_STEP: f32 = 0.25;

/// Keys the viewer reacts to. Window backends translate their key codes
/// into this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    H,
    Z,
    Y,
    ArrowUp,
    ArrowDown,
    Other,
}

/// Modifier state at the time of a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
}

/// Key map from presses to actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub step: f32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self { step: NUDGE_STEP }
    }
}

impl KeyBindings {
    /// Map a key press to an action.
    ///
    /// W/S move along Z, A/D along X, the vertical arrows along Y.
    pub fn map(&self, key: Key, mods: Modifiers) -> Action {
        let s = self.step;
        match key {
            Key::Z if mods.ctrl => Action::Undo,
            Key::Y if mods.ctrl => Action::Redo,
            _ if mods.ctrl => Action::Noop,
            Key::W => Action::Nudge(Vec3::new(0.0, 0.0, -s)),
            Key::S => Action::Nudge(Vec3::new(0.0, 0.0, s)),
            Key::A => Action::Nudge(Vec3::new(-s, 0.0, 0.0)),
            Key::D => Action::Nudge(Vec3::new(s, 0.0, 0.0)),
            Key::ArrowUp => Action::Nudge(Vec3::new(0.0, s, 0.0)),
            Key::ArrowDown => Action::Nudge(Vec3::new(0.0, -s, 0.0)),
            Key::H => Action::TogglePanel,
            Key::Z | Key::Y | Key::Other => Action::Noop,
        }
    }
}

/// Cursor position relative to the window center, each axis in `[-0.5, 0.5]`.
pub fn normalize_cursor(x: f64, y: f64, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    Vec2::new((x / w - 0.5) as f32, (y / h - 0.5) as f32)
}
