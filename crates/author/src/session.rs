use crate::controls::{ParamField, ParamValue};
use crate::editor::{EditError, Editor};
use galaxy_kernel::{DisplayedGalaxy, GalaxyError, GalaxyEvent, GalaxyParameters, Replacement};
use rand::Rng;

/// A message from the control surface. Only finished edits become commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A parameter edit was committed.
    Commit { field: ParamField, value: ParamValue },
    Undo,
    Redo,
    /// Replace every parameter at once.
    Reset(Box<GalaxyParameters>),
    /// Roll new random values with unchanged parameters.
    Regenerate,
}

/// Errors from handling a command.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Galaxy(#[from] GalaxyError),
}

/// The single regeneration handler: owns the parameters, their edit
/// history and the displayed-cloud identity.
pub struct Session {
    params: GalaxyParameters,
    editor: Editor,
    displayed: DisplayedGalaxy,
}

impl Session {
    pub fn new(params: GalaxyParameters) -> Self {
        Self {
            params,
            editor: Editor::new(),
            displayed: DisplayedGalaxy::new(),
        }
    }

    pub fn params(&self) -> &GalaxyParameters {
        &self.params
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn displayed(&self) -> &DisplayedGalaxy {
        &self.displayed
    }

    /// Take the generation events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GalaxyEvent> {
        self.displayed.drain_events()
    }

    /// Generate the first cloud (or re-roll the current one).
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Replacement, GalaxyError> {
        self.displayed.regenerate(&self.params, rng)
    }

    /// Apply a command and regenerate if the parameters changed.
    ///
    /// Returns `Ok(None)` when the command was a no-op. A commit that makes
    /// the parameters invalid is rolled back and reported as an error.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
    ) -> Result<Option<Replacement>, SessionError> {
        let changed = match command {
            Command::Commit { field, value } => {
                let Some(edit) = self.editor.commit(&mut self.params, field, value)? else {
                    return Ok(None);
                };
                tracing::info!(field = field.name(), ?edit, "parameter committed");
                match self.displayed.regenerate(&self.params, rng) {
                    Ok(replacement) => return Ok(Some(replacement)),
                    Err(e) => {
                        self.editor.discard_last(&mut self.params);
                        tracing::warn!("rejected edit of {}: {e}", field.name());
                        return Err(e.into());
                    }
                }
            }
            Command::Undo => self.editor.undo(&mut self.params),
            Command::Redo => self.editor.redo(&mut self.params),
            Command::Reset(params) => {
                params.validate()?;
                self.editor.replace_all(&mut self.params, *params)
            }
            Command::Regenerate => true,
        };

        if !changed {
            return Ok(None);
        }
        Ok(Some(self.displayed.regenerate(&self.params, rng)?))
    }
}
