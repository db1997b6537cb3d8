use glam::{Vec2, Vec3};

/// A high-level action produced from raw window input.
///
/// The viewer consumes actions, never raw input events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move the camera by a fixed delta.
    Nudge(Vec3),
    /// Cursor moved; coordinates are centered, in `[-0.5, 0.5]`.
    Cursor(Vec2),
    /// Enter or leave fullscreen.
    ToggleFullscreen,
    /// Show or hide the debug panel.
    TogglePanel,
    /// Undo the last parameter edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// No-op (used for input that hasn't been bound).
    Noop,
}
