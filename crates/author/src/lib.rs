//! Parameter Authoring: debug-panel controls, reversible edits, the regeneration handler.
//!
//! # Invariants
//! - All parameter edits are reversible.
//! - Regeneration happens only in response to an explicit [`Command`].
//! - Numeric edits never leave their control range.

pub mod controls;
pub mod editor;
pub mod session;

pub use controls::{CONTROLS, ControlSpec, ParamField, ParamValue};
pub use editor::{EditCommand, EditError, Editor};
pub use session::{Command, Session, SessionError};
