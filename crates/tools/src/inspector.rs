use galaxy_common::Rgb;
use galaxy_kernel::PointCloud;
use glam::Vec3;

/// Point-cloud inspector for developer tooling.
///
/// Read-only queries against a generated cloud for the debug panel, the CLI
/// and tests.
pub struct CloudInspector;

impl CloudInspector {
    /// Produce a summary of the cloud.
    pub fn summary(cloud: &PointCloud) -> CloudSummary {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut max_radius = 0.0_f32;
        for p in cloud.points() {
            min = min.min(p);
            max = max.max(p);
            max_radius = max_radius.max(p.x.hypot(p.z));
        }
        if cloud.is_empty() {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }

        let mean_color = cloud.colors().filter(|c| !c.is_empty()).map(|colors| {
            let sum = colors
                .chunks_exact(3)
                .fold(Vec3::ZERO, |acc, c| acc + Vec3::new(c[0], c[1], c[2]));
            let mean = sum / cloud.len() as f32;
            Rgb::new(mean.x, mean.y, mean.z)
        });

        CloudSummary {
            point_count: cloud.len(),
            colored: cloud.colors().is_some(),
            max_radius,
            bounds_min: min.to_array(),
            bounds_max: max.to_array(),
            mean_color,
            point_size: cloud.style().size,
        }
    }

    /// Details of a single point.
    pub fn inspect_point(cloud: &PointCloud, index: usize) -> Option<PointInfo> {
        let p = cloud.position(index)?;
        Some(PointInfo {
            index,
            position: p.to_array(),
            radius: p.x.hypot(p.z),
            color: cloud.color(index),
        })
    }
}

/// Summary of a cloud for the inspector.
#[derive(Debug, Clone)]
pub struct CloudSummary {
    pub point_count: usize,
    pub colored: bool,
    /// Largest distance from the Y axis.
    pub max_radius: f32,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub mean_color: Option<Rgb>,
    pub point_size: f32,
}

impl std::fmt::Display for CloudSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cloud: points={} colored={} max_radius={:.2} size={:.3}",
            self.point_count, self.colored, self.max_radius, self.point_size
        )?;
        if let Some(c) = self.mean_color {
            write!(f, " mean_color={c}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single point.
#[derive(Debug, Clone)]
pub struct PointInfo {
    pub index: usize,
    pub position: [f32; 3],
    pub radius: f32,
    pub color: Option<Rgb>,
}

impl std::fmt::Display for PointInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Point #{} pos=({:.2}, {:.2}, {:.2}) r={:.2}",
            self.index, self.position[0], self.position[1], self.position[2], self.radius,
        )?;
        if let Some(c) = self.color {
            write!(f, " color={c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_kernel::{GalaxyParameters, Gradient, generate_with};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cloud(params: &GalaxyParameters) -> PointCloud {
        generate_with(params, &mut StdRng::seed_from_u64(11)).unwrap()
    }

    #[test]
    fn summary_empty_cloud() {
        let c = cloud(&GalaxyParameters {
            count: 0,
            ..GalaxyParameters::default()
        });
        let summary = CloudInspector::summary(&c);
        assert_eq!(summary.point_count, 0);
        assert_eq!(summary.max_radius, 0.0);
        assert_eq!(summary.bounds_min, [0.0; 3]);
        assert!(summary.mean_color.is_none());
    }

    #[test]
    fn summary_respects_radius() {
        let params = GalaxyParameters {
            randomness: 0.0,
            count: 500,
            ..GalaxyParameters::default()
        };
        let summary = CloudInspector::summary(&cloud(&params));
        assert_eq!(summary.point_count, 500);
        assert!(summary.colored);
        assert!(summary.max_radius <= params.radius + 1e-4);
        assert!(summary.max_radius > 0.0);
    }

    #[test]
    fn mean_color_of_grayscale_gradient_is_gray() {
        let params = GalaxyParameters {
            gradient: Some(Gradient {
                inside: Rgb::WHITE,
                outside: Rgb::BLACK,
            }),
            count: 2000,
            ..GalaxyParameters::default()
        };
        let mean = CloudInspector::summary(&cloud(&params)).mean_color.unwrap();
        assert!((mean.r - mean.g).abs() < 1e-4);
        // Uniform weights average out near the midpoint.
        assert!((mean.r - 0.5).abs() < 0.05);
    }

    #[test]
    fn inspect_point_found() {
        let c = cloud(&GalaxyParameters::default());
        let info = CloudInspector::inspect_point(&c, 4).unwrap();
        assert_eq!(info.index, 4);
        assert_eq!(Vec3::from(info.position), c.position(4).unwrap());
        assert!(info.color.is_some());
    }

    #[test]
    fn inspect_point_out_of_range() {
        let c = cloud(&GalaxyParameters::default());
        assert!(CloudInspector::inspect_point(&c, c.len()).is_none());
    }

    #[test]
    fn summary_display() {
        let c = cloud(&GalaxyParameters::legacy());
        let s = format!("{}", CloudInspector::summary(&c));
        assert!(s.contains("points=1000"));
        assert!(s.contains("colored=false"));
        assert!(!s.contains("mean_color"));
    }
}
