use crate::controls::{self, ControlSpec, ParamField, ParamValue};
use galaxy_kernel::GalaxyParameters;

/// A parameter edit that can be applied and reversed.
///
/// Each command carries enough context to undo itself.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Change one field. Undo = restore the old value.
    SetParameter {
        field: ParamField,
        old: ParamValue,
        new: ParamValue,
    },
    /// Replace the whole parameter set (preset load, reset).
    ReplaceAll {
        old: Box<GalaxyParameters>,
        new: Box<GalaxyParameters>,
    },
}

impl EditCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::SetParameter { field, old, new } => Self::SetParameter {
                field: *field,
                old: *new,
                new: *old,
            },
            Self::ReplaceAll { old, new } => Self::ReplaceAll {
                old: new.clone(),
                new: old.clone(),
            },
        }
    }
}

/// Errors from edit operations.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("value {value:?} does not fit field `{}`", field.name())]
    KindMismatch { field: ParamField, value: ParamValue },
}

/// Editor with undo/redo support for galaxy parameters.
///
/// Every committed edit is reversible via `undo()` and re-applicable via
/// `redo()`. Numeric commits are clamped and snapped to their control step.
pub struct Editor {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl Editor {
    /// Create a new editor.
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Commit a field value. Returns `Ok(None)` when the value did not change.
    pub fn commit(
        &mut self,
        params: &mut GalaxyParameters,
        field: ParamField,
        value: ParamValue,
    ) -> Result<Option<EditCommand>, EditError> {
        let value = match (value, ControlSpec::for_field(field)) {
            (ParamValue::Number(v), Some(spec)) => ParamValue::Number(spec.constrain(v)),
            _ => value,
        };
        let old = controls::get(params, field);
        if !controls::set(params, field, value) {
            return Err(EditError::KindMismatch { field, value });
        }
        let new = controls::get(params, field);
        if new == old {
            return Ok(None);
        }
        let cmd = EditCommand::SetParameter { field, old, new };
        self.undo_stack.push(cmd.clone());
        self.redo_stack.clear();
        Ok(Some(cmd))
    }

    /// Replace the whole parameter set and push to undo stack.
    pub fn replace_all(&mut self, params: &mut GalaxyParameters, new: GalaxyParameters) -> bool {
        if *params == new {
            return false;
        }
        let old = std::mem::replace(params, new.clone());
        self.undo_stack.push(EditCommand::ReplaceAll {
            old: Box::new(old),
            new: Box::new(new),
        });
        self.redo_stack.clear();
        true
    }

    /// Undo the last edit. Returns true if an operation was undone.
    pub fn undo(&mut self, params: &mut GalaxyParameters) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        apply_command(params, &cmd.inverse());
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self, params: &mut GalaxyParameters) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        apply_command(params, &cmd);
        self.undo_stack.push(cmd);
        true
    }

    /// Revert the last edit without making it redoable.
    pub fn discard_last(&mut self, params: &mut GalaxyParameters) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        apply_command(params, &cmd.inverse());
        true
    }

    /// Number of operations on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_command(params: &mut GalaxyParameters, cmd: &EditCommand) {
    match cmd {
        EditCommand::SetParameter { field, new, .. } => {
            controls::set(params, *field, *new);
        }
        EditCommand::ReplaceAll { new, .. } => {
            *params = (**new).clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_common::Rgb;

    #[test]
    fn commit_and_undo() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();

        editor
            .commit(&mut params, ParamField::Branches, ParamValue::Number(5.0))
            .unwrap();
        assert_eq!(params.branches, 5);

        assert!(editor.undo(&mut params));
        assert_eq!(params.branches, 3);
    }

    #[test]
    fn commit_undo_redo() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();

        editor
            .commit(&mut params, ParamField::Spin, ParamValue::Number(-2.0))
            .unwrap();
        editor.undo(&mut params);
        assert_eq!(params.spin, 1.0);

        editor.redo(&mut params);
        assert!((params.spin + 2.0).abs() < 1e-4);
    }

    #[test]
    fn commit_is_constrained_by_control() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();

        editor
            .commit(&mut params, ParamField::Branches, ParamValue::Number(20.0))
            .unwrap();
        assert_eq!(params.branches, 8);

        editor
            .commit(&mut params, ParamField::Count, ParamValue::Number(1550.0))
            .unwrap();
        assert_eq!(params.count, 1600);
    }

    #[test]
    fn unchanged_commit_is_not_recorded() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();

        let cmd = editor
            .commit(&mut params, ParamField::Branches, ParamValue::Number(3.0))
            .unwrap();
        assert!(cmd.is_none());
        assert!(!editor.can_undo());
    }

    #[test]
    fn kind_mismatch_is_an_error() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();
        let err = editor
            .commit(&mut params, ParamField::Radius, ParamValue::Color(Rgb::WHITE))
            .unwrap_err();
        assert!(matches!(err, EditError::KindMismatch { field: ParamField::Radius, .. }));
        assert!(!editor.can_undo());
    }

    #[test]
    fn color_commit_and_undo() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();
        let original = params.gradient.unwrap().outside;

        editor
            .commit(&mut params, ParamField::OutsideColor, ParamValue::Color(Rgb::BLACK))
            .unwrap();
        assert_eq!(params.gradient.unwrap().outside, Rgb::BLACK);

        editor.undo(&mut params);
        assert_eq!(params.gradient.unwrap().outside, original);
    }

    #[test]
    fn replace_all_and_undo() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();

        assert!(editor.replace_all(&mut params, GalaxyParameters::legacy()));
        assert!(params.gradient.is_none());

        editor.undo(&mut params);
        assert_eq!(params, GalaxyParameters::default());
        assert!(!editor.replace_all(&mut params, GalaxyParameters::default()));
    }

    #[test]
    fn redo_cleared_on_new_edit() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();

        editor
            .commit(&mut params, ParamField::Radius, ParamValue::Number(8.0))
            .unwrap();
        editor.undo(&mut params);
        assert!(editor.can_redo());

        // New edit clears redo stack
        editor
            .commit(&mut params, ParamField::Radius, ParamValue::Number(9.0))
            .unwrap();
        assert!(!editor.can_redo());
    }

    #[test]
    fn discard_last_is_not_redoable() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();

        editor
            .commit(&mut params, ParamField::Wave, ParamValue::Number(1.0))
            .unwrap();
        assert!(editor.discard_last(&mut params));
        assert_eq!(params.wave, 0.0);
        assert!(!editor.can_redo());
        assert!(!editor.can_undo());
    }

    #[test]
    fn undo_redo_empty_return_false() {
        let mut params = GalaxyParameters::default();
        let mut editor = Editor::new();
        assert!(!editor.undo(&mut params));
        assert!(!editor.redo(&mut params));
        assert_eq!(editor.undo_count(), 0);
        assert_eq!(editor.redo_count(), 0);
    }
}
