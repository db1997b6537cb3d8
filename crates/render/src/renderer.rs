use crate::scene::HeadlessScene;
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Viewport size in physical pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            width: 1280,
            height: 720,
        }
    }
}

impl RenderView {
    /// Width over height; a zero-height viewport counts as one pixel tall.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view configuration, then produces
/// output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable string representation of the scene. Used by
/// the CLI, logging, and tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Points listed per cloud.
    pub preview_points: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preview(preview_points: usize) -> Self {
        Self { preview_points }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (clouds={}, disposed={}) ===\n",
            scene.clouds().len(),
            scene.disposed()
        ));
        out.push_str(&format!(
            concat!(
                "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) ",
                "fov={:.0} viewport={}x{}\n"
            ),
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            view.width,
            view.height
        ));

        for (id, cloud) in scene.clouds() {
            let style = cloud.style();
            out.push_str(&format!(
                "  [{}] points={} colored={} size={:.3}{}\n",
                id,
                cloud.len(),
                cloud.colors().is_some(),
                style.size,
                if style.additive { " additive" } else { "" }
            ));
            for i in 0..self.preview_points.min(cloud.len()) {
                let Some(p) = cloud.position(i) else { break };
                out.push_str(&format!("    #{i} pos=({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                if let Some(c) = cloud.color(i) {
                    out.push_str(&format!(" color={c}"));
                }
                out.push('\n');
            }
        }

        out
    }
}
