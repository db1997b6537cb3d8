use crate::cloud::{PointCloud, PointStyle, STRIDE};
use crate::error::GalaxyError;
use crate::params::GalaxyParameters;
use rand::Rng;
use std::f32::consts::TAU;

/// Base angle of the arm that owns point `index`.
///
/// Arms are assigned round-robin, so indices `i` and `i + branches` always
/// share an arm.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

/// Generate a fresh cloud using the thread-local RNG.
pub fn generate(params: &GalaxyParameters) -> Result<PointCloud, GalaxyError> {
    generate_with(params, &mut rand::rng())
}

/// Generate a fresh cloud, drawing every random value from `rng`.
///
/// Per point: a radius in `[0, radius)`, the arm angle plus `radius * spin`,
/// three jitter draws, then one gradient weight if the cloud is colored.
pub fn generate_with<R: Rng + ?Sized>(
    params: &GalaxyParameters,
    rng: &mut R,
) -> Result<PointCloud, GalaxyError> {
    params.validate()?;

    let count = params.count as usize;
    let mut positions = Vec::with_capacity(count * STRIDE);
    let mut colors = params.gradient.map(|_| Vec::with_capacity(count * STRIDE));

    for i in 0..count {
        let radius = rng.random::<f32>() * params.radius;
        let angle = branch_angle(i, params.branches) + radius * params.spin;

        let jitter_x = jitter(rng, params);
        let jitter_y = jitter(rng, params);
        let jitter_z = jitter(rng, params);
        let wave = (i as f64).sin() as f32 * params.wave;

        positions.extend_from_slice(&[
            angle.cos() * radius + jitter_x,
            jitter_y + wave,
            angle.sin() * radius + jitter_z,
        ]);

        if let (Some(gradient), Some(colors)) = (params.gradient, colors.as_mut()) {
            let weight = rng.random::<f32>();
            colors.extend_from_slice(&gradient.inside.lerp(gradient.outside, weight).to_array());
        }
    }

    tracing::debug!(
        count,
        branches = params.branches,
        colored = colors.is_some(),
        "generated galaxy point cloud"
    );

    Ok(PointCloud::new(
        positions,
        colors,
        PointStyle::additive(params.size),
    ))
}

/// `u^power` with a random sign, scaled by the randomness bound.
fn jitter<R: Rng + ?Sized>(rng: &mut R, params: &GalaxyParameters) -> f32 {
    let magnitude = rng.random::<f32>().powf(params.randomness_power);
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    magnitude * sign * params.randomness
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Gradient;
    use galaxy_common::Rgb;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f32 = 1e-4;

    fn flat(branches: u32, count: u32) -> GalaxyParameters {
        GalaxyParameters {
            branches,
            count,
            radius: 5.0,
            spin: 0.0,
            randomness: 0.0,
            randomness_power: 1.0,
            gradient: Some(Gradient {
                inside: Rgb::WHITE,
                outside: Rgb::BLACK,
            }),
            wave: 0.0,
            size: 0.02,
        }
    }

    /// Angle of a point in the XZ plane, in `[0, TAU)`.
    fn xz_angle(x: f32, z: f32) -> f32 {
        z.atan2(x).rem_euclid(TAU)
    }

    fn angle_close(a: f32, b: f32) -> bool {
        let d = (a - b).rem_euclid(TAU);
        d < EPS || TAU - d < EPS
    }

    #[test]
    fn buffer_lengths_match_count() {
        let mut rng = StdRng::seed_from_u64(1);
        for count in [0, 1, 7, 1000] {
            let cloud = generate_with(
                &GalaxyParameters {
                    count,
                    ..GalaxyParameters::default()
                },
                &mut rng,
            )
            .unwrap();
            assert_eq!(cloud.positions().len(), count as usize * 3);
            assert_eq!(cloud.colors().unwrap().len(), count as usize * 3);
            assert_eq!(cloud.len(), count as usize);
        }
    }

    #[test]
    fn zero_count_gives_empty_buffers() {
        let cloud = generate(&flat(3, 0)).unwrap();
        assert!(cloud.is_empty());
        assert!(cloud.colors().unwrap().is_empty());
    }

    #[test]
    fn points_without_jitter_stay_inside_radius() {
        let mut rng = StdRng::seed_from_u64(2);
        let params = GalaxyParameters {
            randomness: 0.0,
            count: 2000,
            ..GalaxyParameters::default()
        };
        let cloud = generate_with(&params, &mut rng).unwrap();
        for p in cloud.points() {
            assert!(p.x.hypot(p.z) <= params.radius + EPS);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn jitter_is_bounded_by_randomness() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = GalaxyParameters {
            randomness: 0.3,
            randomness_power: 2.0,
            count: 2000,
            ..GalaxyParameters::default()
        };
        let cloud = generate_with(&params, &mut rng).unwrap();
        // Each of x and z carries at most one jitter of size `randomness`.
        let bound = params.radius + params.randomness * std::f32::consts::SQRT_2 + EPS;
        for p in cloud.points() {
            assert!(p.y.abs() <= params.randomness + EPS);
            assert!(p.x.hypot(p.z) <= bound);
        }
    }

    #[test]
    fn branch_angle_is_periodic() {
        for branches in 1..9 {
            for i in 0..50 {
                assert_eq!(
                    branch_angle(i, branches),
                    branch_angle(i + branches as usize, branches)
                );
            }
        }
        assert_eq!(branch_angle(0, 3), 0.0);
        assert!((branch_angle(1, 3) - TAU / 3.0).abs() < EPS);
    }

    #[test]
    fn three_branch_scenario_without_spin_or_jitter() {
        let mut rng = StdRng::seed_from_u64(4);
        let cloud = generate_with(&flat(3, 6), &mut rng).unwrap();
        let expected = [0.0, TAU / 3.0, 2.0 * TAU / 3.0];

        for i in 0..6 {
            let p = cloud.position(i).unwrap();
            // Points drawn at the very center have no measurable angle.
            if p.x.hypot(p.z) > EPS {
                assert!(
                    angle_close(xz_angle(p.x, p.z), expected[i % 3]),
                    "point {i}: {p}"
                );
            }
            let c = cloud.color(i).unwrap();
            assert!((c.r - c.g).abs() < EPS && (c.g - c.b).abs() < EPS, "not gray: {c:?}");
        }
    }

    #[test]
    fn spin_twists_angle_by_radius() {
        let mut rng = StdRng::seed_from_u64(5);
        let params = GalaxyParameters {
            spin: 1.0,
            ..flat(1, 200)
        };
        let cloud = generate_with(&params, &mut rng).unwrap();
        for p in cloud.points() {
            let r = p.x.hypot(p.z);
            if r > EPS {
                assert!(angle_close(xz_angle(p.x, p.z), r * params.spin));
            }
        }
    }

    #[test]
    fn colors_lie_between_gradient_endpoints() {
        let mut rng = StdRng::seed_from_u64(6);
        let inside = Rgb::new(1.0, 0.376, 0.188);
        let outside = Rgb::new(0.106, 0.224, 0.518);
        let params = GalaxyParameters {
            gradient: Some(Gradient { inside, outside }),
            count: 500,
            ..GalaxyParameters::default()
        };
        let cloud = generate_with(&params, &mut rng).unwrap();
        let within = |v: f32, a: f32, b: f32| v >= a.min(b) - EPS && v <= a.max(b) + EPS;
        for i in 0..cloud.len() {
            let c = cloud.color(i).unwrap();
            assert!(within(c.r, inside.r, outside.r));
            assert!(within(c.g, inside.g, outside.g));
            assert!(within(c.b, inside.b, outside.b));
        }
    }

    #[test]
    fn no_gradient_means_no_color_buffer() {
        let cloud = generate(&GalaxyParameters::legacy()).unwrap();
        assert!(cloud.colors().is_none());
        assert_eq!(cloud.positions().len(), 3000);
    }

    #[test]
    fn legacy_wave_is_deterministic_in_y() {
        let params = GalaxyParameters::legacy();
        let a = generate(&params).unwrap();
        let b = generate(&params).unwrap();
        for i in 0..a.len() {
            let y = a.position(i).unwrap().y;
            assert!((y - (i as f32).sin() * 0.5).abs() < EPS);
            assert_eq!(y, b.position(i).unwrap().y);
        }
    }

    #[test]
    fn unseeded_calls_differ_but_share_shape() {
        let params = GalaxyParameters::default();
        let a = generate(&params).unwrap();
        let b = generate(&params).unwrap();
        assert_eq!(a.positions().len(), b.positions().len());
        assert_ne!(a.positions(), b.positions());
    }

    #[test]
    fn unseeded_calls_share_distribution() {
        let params = GalaxyParameters {
            count: 20_000,
            ..GalaxyParameters::default()
        };
        let mean_radius = |cloud: &PointCloud| {
            cloud.points().map(|p| p.x.hypot(p.z)).sum::<f32>() / cloud.len() as f32
        };
        let mean_red = |cloud: &PointCloud| {
            (0..cloud.len())
                .filter_map(|i| cloud.color(i))
                .map(|c| c.r)
                .sum::<f32>()
                / cloud.len() as f32
        };

        let a = generate(&params).unwrap();
        let b = generate(&params).unwrap();
        // Uniform radius on [0, 5) averages 2.5; jitter barely moves it.
        assert!((mean_radius(&a) - params.radius / 2.0).abs() < 0.15);
        assert!((mean_radius(&a) - mean_radius(&b)).abs() < 0.1);
        assert!((mean_red(&a) - mean_red(&b)).abs() < 0.02);
    }

    #[test]
    fn seeded_calls_reproduce() {
        let params = GalaxyParameters::default();
        let a = generate_with(&params, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate_with(&params, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn input_parameters_are_untouched() {
        let params = GalaxyParameters::default();
        let before = params.clone();
        generate(&params).unwrap();
        assert_eq!(params, before);
    }

    #[test]
    fn invalid_parameters_rejected() {
        let params = GalaxyParameters {
            branches: 0,
            ..GalaxyParameters::default()
        };
        assert!(matches!(
            generate(&params),
            Err(GalaxyError::InvalidParameter { .. })
        ));

        let params = GalaxyParameters {
            randomness_power: -3.0,
            ..GalaxyParameters::default()
        };
        assert!(matches!(
            generate_with(&params, &mut StdRng::seed_from_u64(1)),
            Err(GalaxyError::InvalidParameter {
                name: "randomness_power",
                ..
            })
        ));
    }

    #[test]
    fn style_carries_point_size() {
        let params = GalaxyParameters {
            size: 0.5,
            ..flat(2, 4)
        };
        let cloud = generate(&params).unwrap();
        assert_eq!(cloud.style().size, 0.5);
        assert!(cloud.style().additive);
    }
}
