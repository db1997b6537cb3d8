use galaxy_common::Rgb;
use galaxy_kernel::{GalaxyParameters, Gradient};

/// A parameter that the debug panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Branches,
    Count,
    Radius,
    Size,
    Spin,
    Randomness,
    RandomnessPower,
    Wave,
    /// Whether the cloud carries a color gradient.
    Colored,
    InsideColor,
    OutsideColor,
}

impl ParamField {
    pub const ALL: [ParamField; 11] = [
        Self::Branches,
        Self::Count,
        Self::Radius,
        Self::Size,
        Self::Spin,
        Self::Randomness,
        Self::RandomnessPower,
        Self::Wave,
        Self::Colored,
        Self::InsideColor,
        Self::OutsideColor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Branches => "branches",
            Self::Count => "count",
            Self::Radius => "radius",
            Self::Size => "size",
            Self::Spin => "spin",
            Self::Randomness => "randomness",
            Self::RandomnessPower => "randomness power",
            Self::Wave => "wave",
            Self::Colored => "colored",
            Self::InsideColor => "inside color",
            Self::OutsideColor => "outside color",
        }
    }
}

/// A value held by a [`ParamField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Number(f32),
    Toggle(bool),
    Color(Rgb),
}

/// Slider declaration for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub field: ParamField,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

/// Slider ranges of the debug panel.
#[rustfmt::skip]
pub const CONTROLS: &[ControlSpec] = &[
    ControlSpec { field: ParamField::Branches, min: 2.0, max: 8.0, step: 1.0 },
    ControlSpec { field: ParamField::Count, min: 100.0, max: 100_000.0, step: 100.0 },
    ControlSpec { field: ParamField::Radius, min: 0.01, max: 20.0, step: 0.01 },
    ControlSpec { field: ParamField::Size, min: 0.01, max: 0.8, step: 0.01 },
    ControlSpec { field: ParamField::Spin, min: -5.0, max: 5.0, step: 0.001 },
    ControlSpec { field: ParamField::Randomness, min: 0.0, max: 2.0, step: 0.001 },
    ControlSpec { field: ParamField::RandomnessPower, min: 1.0, max: 10.0, step: 0.001 },
    ControlSpec { field: ParamField::Wave, min: 0.0, max: 2.0, step: 0.01 },
];

impl ControlSpec {
    /// Slider declaration for `field`, if it is numeric.
    pub fn for_field(field: ParamField) -> Option<&'static ControlSpec> {
        CONTROLS.iter().find(|c| c.field == field)
    }

    /// Clamp to `[min, max]` and snap to the nearest step from `min`.
    pub fn constrain(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

/// Read a field from a parameter set.
pub fn get(params: &GalaxyParameters, field: ParamField) -> ParamValue {
    let gradient = params.gradient.unwrap_or_default();
    match field {
        ParamField::Branches => ParamValue::Number(params.branches as f32),
        ParamField::Count => ParamValue::Number(params.count as f32),
        ParamField::Radius => ParamValue::Number(params.radius),
        ParamField::Size => ParamValue::Number(params.size),
        ParamField::Spin => ParamValue::Number(params.spin),
        ParamField::Randomness => ParamValue::Number(params.randomness),
        ParamField::RandomnessPower => ParamValue::Number(params.randomness_power),
        ParamField::Wave => ParamValue::Number(params.wave),
        ParamField::Colored => ParamValue::Toggle(params.gradient.is_some()),
        ParamField::InsideColor => ParamValue::Color(gradient.inside),
        ParamField::OutsideColor => ParamValue::Color(gradient.outside),
    }
}

/// Write a field. Returns `false` when the value kind does not match the field.
///
/// Setting a gradient color on an uncolored set enables the default gradient
/// first.
pub fn set(params: &mut GalaxyParameters, field: ParamField, value: ParamValue) -> bool {
    match (field, value) {
        (ParamField::Branches, ParamValue::Number(v)) => {
            params.branches = v.round().max(0.0) as u32;
        }
        (ParamField::Count, ParamValue::Number(v)) => params.count = v.round().max(0.0) as u32,
        (ParamField::Radius, ParamValue::Number(v)) => params.radius = v,
        (ParamField::Size, ParamValue::Number(v)) => params.size = v,
        (ParamField::Spin, ParamValue::Number(v)) => params.spin = v,
        (ParamField::Randomness, ParamValue::Number(v)) => params.randomness = v,
        (ParamField::RandomnessPower, ParamValue::Number(v)) => params.randomness_power = v,
        (ParamField::Wave, ParamValue::Number(v)) => params.wave = v,
        (ParamField::Colored, ParamValue::Toggle(on)) => {
            params.gradient = on.then(|| params.gradient.unwrap_or_default());
        }
        (ParamField::InsideColor, ParamValue::Color(c)) => {
            params.gradient.get_or_insert_with(Gradient::default).inside = c;
        }
        (ParamField::OutsideColor, ParamValue::Color(c)) => {
            params.gradient.get_or_insert_with(Gradient::default).outside = c;
        }
        _ => return false,
    }
    true
}
