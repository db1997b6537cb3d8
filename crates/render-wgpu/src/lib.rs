//! wgpu render backend for the galaxy viewer.
//!
//! Draws each point cloud as camera-facing sprites with additive blending,
//! plus a small axes helper at the origin. The camera orbits the origin with
//! damping.
//!
//! # Invariants
//! - Renderer never mutates galaxy parameters.
//! - A cloud's GPU buffers are destroyed when it is removed from the scene.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::{GpuScene, WgpuRenderer};
