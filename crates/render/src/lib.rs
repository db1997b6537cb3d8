//! Rendering Adapter: renderer-agnostic scene interface.
//!
//! # Invariants
//! - Renderers never mutate the scene or the generator.
//! - A retired cloud is released before its replacement is inserted.
//! - After any number of presentations exactly one cloud is attached.
//!
//! The headless backend and text renderer mirror what the GPU backend does,
//! so the presentation contract can be exercised without a device.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{HeadlessScene, SceneBackend, present};

pub fn crate_info() -> &'static str {
    "galaxy-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
