//! Galaxy Kernel: parameters, point-cloud generation, ownership of the displayed cloud.
//!
//! # Invariants
//! - Generated buffers are always exactly `count * 3` floats.
//! - Branch assignment is `index mod branches`, never random.
//! - Parameters are validated before any buffer is allocated.
//! - At most one cloud id is current at a time; replacing it retires the old one.

pub mod cloud;
pub mod displayed;
pub mod error;
pub mod generator;
pub mod params;
pub mod preset;

pub use cloud::{PointCloud, PointStyle};
pub use displayed::{DisplayedGalaxy, GalaxyEvent, Replacement};
pub use error::GalaxyError;
pub use generator::{branch_angle, generate, generate_with};
pub use params::{GalaxyParameters, Gradient};
pub use preset::{PresetError, load_preset};
