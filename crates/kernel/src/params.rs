use crate::error::GalaxyError;
use galaxy_common::Rgb;
use serde::{Deserialize, Serialize};

/// Two-color gradient applied across the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub inside: Rgb,
    pub outside: Rgb,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            inside: Rgb::from_u32(0xff6030),
            outside: Rgb::from_u32(0x1b3984),
        }
    }
}

/// Parameter set for one generation call.
///
/// Spin, jitter, gradient and wave are optional features of the same
/// generator: setting `spin`, `randomness` and `wave` to zero and `gradient`
/// to `None` gives flat, uncolored arms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParameters {
    /// Number of spiral arms.
    pub branches: u32,
    /// Number of points.
    pub count: u32,
    /// Maximum spawn distance from the center.
    pub radius: f32,
    /// Angular twist per unit radius.
    pub spin: f32,
    /// Upper bound of the per-axis jitter.
    pub randomness: f32,
    /// Falloff exponent of the jitter; higher values pull points onto the arm.
    pub randomness_power: f32,
    /// Color gradient. `None` produces no color buffer.
    pub gradient: Option<Gradient>,
    /// Amplitude of the `sin(index)` vertical wave.
    pub wave: f32,
    /// Rendered point size in world units.
    pub size: f32,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            branches: 3,
            count: 1000,
            radius: 5.0,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            gradient: Some(Gradient::default()),
            wave: 0.0,
            size: 0.02,
        }
    }
}

impl GalaxyParameters {
    /// The first incarnation of the demo: straight uncolored arms with a
    /// vertical sine wave.
    pub fn legacy() -> Self {
        Self {
            spin: 0.0,
            randomness: 0.0,
            gradient: None,
            wave: 0.5,
            ..Self::default()
        }
    }

    /// Check every field against the generator's preconditions.
    pub fn validate(&self) -> Result<(), GalaxyError> {
        if self.branches < 1 {
            return Err(GalaxyError::invalid("branches", "must be at least 1"));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GalaxyError::invalid(
                "radius",
                format!("must be positive and finite, got {}", self.radius),
            ));
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(GalaxyError::invalid(
                "size",
                format!("must be positive and finite, got {}", self.size),
            ));
        }
        if !(self.randomness.is_finite() && self.randomness >= 0.0) {
            return Err(GalaxyError::invalid(
                "randomness",
                format!("must be non-negative and finite, got {}", self.randomness),
            ));
        }
        // A negative exponent turns `u^power` on `[0, 1)` into an unbounded jitter.
        if !(self.randomness_power.is_finite() && self.randomness_power >= 0.0) {
            return Err(GalaxyError::invalid(
                "randomness_power",
                format!("must be non-negative and finite, got {}", self.randomness_power),
            ));
        }
        for (name, value) in [("spin", self.spin), ("wave", self.wave)] {
            if !value.is_finite() {
                return Err(GalaxyError::invalid(name, "must be finite"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GalaxyParameters::default().validate().is_ok());
        assert!(GalaxyParameters::legacy().validate().is_ok());
    }

    #[test]
    fn legacy_preset_disables_spin_jitter_and_color() {
        let p = GalaxyParameters::legacy();
        assert_eq!(p.spin, 0.0);
        assert_eq!(p.randomness, 0.0);
        assert!(p.gradient.is_none());
        assert_eq!(p.wave, 0.5);
        assert_eq!(p.branches, 3);
    }

    #[test]
    fn zero_branches_rejected() {
        let p = GalaxyParameters {
            branches: 0,
            ..GalaxyParameters::default()
        };
        assert!(matches!(
            p.validate(),
            Err(GalaxyError::InvalidParameter {
                name: "branches",
                ..
            })
        ));
    }

    #[test]
    fn non_positive_radius_and_size_rejected() {
        let p = GalaxyParameters {
            radius: 0.0,
            ..GalaxyParameters::default()
        };
        assert!(p.validate().is_err());

        let p = GalaxyParameters {
            size: -1.0,
            ..GalaxyParameters::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn non_finite_values_rejected() {
        let p = GalaxyParameters {
            spin: f32::NAN,
            ..GalaxyParameters::default()
        };
        assert!(matches!(
            p.validate(),
            Err(GalaxyError::InvalidParameter { name: "spin", .. })
        ));

        let p = GalaxyParameters {
            randomness: f32::INFINITY,
            ..GalaxyParameters::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_power_rejected() {
        let p = GalaxyParameters {
            randomness_power: -3.0,
            ..GalaxyParameters::default()
        };
        assert!(matches!(
            p.validate(),
            Err(GalaxyError::InvalidParameter {
                name: "randomness_power",
                ..
            })
        ));

        let p = GalaxyParameters {
            randomness_power: 0.0,
            ..GalaxyParameters::default()
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_count_is_valid() {
        let p = GalaxyParameters {
            count: 0,
            ..GalaxyParameters::default()
        };
        assert!(p.validate().is_ok());
    }
}
