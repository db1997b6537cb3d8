//! Viewer Input: keyboard and mouse mapped to renderer-independent actions.
//!
//! # Invariants
//! - Input never touches the generator; parameter edits go through the debug panel.
//! - Camera nudges are fixed steps, independent of frame time.

pub mod action;
pub mod bindings;

pub use action::Action;
pub use bindings::{Key, KeyBindings, Modifiers, NUDGE_STEP, normalize_cursor};
