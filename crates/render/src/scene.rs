use galaxy_common::CloudId;
use galaxy_kernel::{PointCloud, Replacement};
use std::collections::BTreeMap;

/// The display side of the rendering backend: a scene that holds clouds.
///
/// Removing a cloud must release every resource the backend allocated for it.
pub trait SceneBackend {
    /// Add a cloud to the scene under `id`.
    fn insert_cloud(&mut self, id: CloudId, cloud: &PointCloud);

    /// Remove a cloud and release its resources. Returns false if absent.
    fn remove_cloud(&mut self, id: CloudId) -> bool;

    /// Number of clouds currently attached.
    fn cloud_count(&self) -> usize;
}

/// Hand a replacement to the backend: the retired cloud is removed and
/// released before the new one is inserted.
pub fn present<B: SceneBackend + ?Sized>(backend: &mut B, replacement: &Replacement) {
    if let Some(retired) = replacement.retired {
        if !backend.remove_cloud(retired) {
            tracing::warn!(id = %retired, "retired cloud was not attached");
        }
    }
    backend.insert_cloud(replacement.id, &replacement.cloud);
    tracing::info!(
        id = %replacement.id,
        points = replacement.cloud.len(),
        attached = backend.cloud_count(),
        "presented galaxy"
    );
}

/// In-memory scene used by the CLI and tests.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    clouds: BTreeMap<CloudId, PointCloud>,
    disposed: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached clouds in id order.
    pub fn clouds(&self) -> &BTreeMap<CloudId, PointCloud> {
        &self.clouds
    }

    /// Number of clouds released so far.
    pub fn disposed(&self) -> usize {
        self.disposed
    }
}

impl SceneBackend for HeadlessScene {
    fn insert_cloud(&mut self, id: CloudId, cloud: &PointCloud) {
        self.clouds.insert(id, cloud.clone());
    }

    fn remove_cloud(&mut self, id: CloudId) -> bool {
        let removed = self.clouds.remove(&id).is_some();
        if removed {
            self.disposed += 1;
        }
        removed
    }

    fn cloud_count(&self) -> usize {
        self.clouds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_kernel::{DisplayedGalaxy, GalaxyParameters};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn one_cloud_attached_after_many_regenerations() {
        let mut scene = HeadlessScene::new();
        let mut displayed = DisplayedGalaxy::new();
        let mut rng = StdRng::seed_from_u64(1);
        let params = GalaxyParameters {
            count: 50,
            ..GalaxyParameters::default()
        };

        for n in 1..=10 {
            let replacement = displayed.regenerate(&params, &mut rng).unwrap();
            present(&mut scene, &replacement);
            assert_eq!(scene.cloud_count(), 1);
            assert_eq!(scene.disposed(), n - 1);
            assert!(scene.clouds().contains_key(&replacement.id));
        }
    }

    #[test]
    fn first_presentation_disposes_nothing() {
        let mut scene = HeadlessScene::new();
        let mut displayed = DisplayedGalaxy::new();
        let mut rng = StdRng::seed_from_u64(2);
        let r = displayed
            .regenerate(&GalaxyParameters::default(), &mut rng)
            .unwrap();
        present(&mut scene, &r);
        assert_eq!(scene.disposed(), 0);
        assert_eq!(scene.clouds()[&r.id].len(), 1000);
    }

    #[test]
    fn remove_missing_cloud_returns_false() {
        let mut scene = HeadlessScene::new();
        assert!(!scene.remove_cloud(CloudId::new()));
        assert_eq!(scene.disposed(), 0);
    }

    #[test]
    fn removing_the_attached_cloud_disposes_it() {
        let mut scene = HeadlessScene::new();
        let mut displayed = DisplayedGalaxy::new();
        let mut rng = StdRng::seed_from_u64(3);
        let r = displayed
            .regenerate(&GalaxyParameters::default(), &mut rng)
            .unwrap();
        present(&mut scene, &r);

        assert!(scene.remove_cloud(r.id));
        assert_eq!(scene.cloud_count(), 0);
        assert_eq!(scene.disposed(), 1);
    }
}
