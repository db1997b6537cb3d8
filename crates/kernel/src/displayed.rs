use crate::cloud::PointCloud;
use crate::error::GalaxyError;
use crate::generator::generate_with;
use crate::params::GalaxyParameters;
use galaxy_common::CloudId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An event record produced by every change of the displayed cloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GalaxyEvent {
    /// A new cloud was generated and became current.
    Generated {
        id: CloudId,
        generation: u64,
        count: usize,
    },
    /// A cloud stopped being current and must be disposed.
    Retired { id: CloudId },
}

/// Output of a regeneration: the new cloud plus the disposal instruction for
/// the cloud it replaces.
#[derive(Debug, Clone)]
pub struct Replacement {
    /// Cloud that must be removed and released before `cloud` is shown.
    pub retired: Option<CloudId>,
    pub id: CloudId,
    pub cloud: PointCloud,
}

/// Owner of the identity of the currently displayed cloud.
///
/// The owner never holds GPU resources itself; it tells the backend which
/// cloud to release through [`Replacement::retired`].
#[derive(Debug, Default)]
pub struct DisplayedGalaxy {
    current: Option<CloudId>,
    generation: u64,
    event_log: Vec<GalaxyEvent>,
}

impl DisplayedGalaxy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the cloud currently on display.
    pub fn current(&self) -> Option<CloudId> {
        self.current
    }

    /// Number of successful regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GalaxyEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GalaxyEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Generate a new cloud and make it current.
    ///
    /// On a validation error nothing changes and the previous cloud stays
    /// current.
    pub fn regenerate<R: Rng + ?Sized>(
        &mut self,
        params: &GalaxyParameters,
        rng: &mut R,
    ) -> Result<Replacement, GalaxyError> {
        let cloud = generate_with(params, rng)?;
        let id = CloudId::new();
        let retired = self.current.replace(id);
        self.generation += 1;

        if let Some(old) = retired {
            self.event_log.push(GalaxyEvent::Retired { id: old });
        }
        self.event_log.push(GalaxyEvent::Generated {
            id,
            generation: self.generation,
            count: cloud.len(),
        });

        tracing::debug!(
            generation = self.generation,
            id = %id,
            retired = ?retired.map(|r| r.short()),
            "galaxy regenerated"
        );

        Ok(Replacement { retired, id, cloud })
    }
}
