use galaxy_common::Rgb;
use glam::Vec3;

/// Number of floats per point in both the position and color buffers.
pub const STRIDE: usize = 3;

/// How the backend should draw the points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    /// Point size in world units.
    pub size: f32,
    /// Shrink points with distance from the camera.
    pub size_attenuation: bool,
    /// Additive blending, so overlapping points brighten.
    pub additive: bool,
    pub depth_write: bool,
}

impl PointStyle {
    pub fn additive(size: f32) -> Self {
        Self {
            size,
            size_attenuation: true,
            additive: true,
            depth_write: false,
        }
    }
}

/// A generated point cloud: flat `f32` position triples and optional color
/// triples, ready to be uploaded as vertex buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Option<Vec<f32>>,
    style: PointStyle,
}

impl PointCloud {
    pub(crate) fn new(positions: Vec<f32>, colors: Option<Vec<f32>>, style: PointStyle) -> Self {
        debug_assert_eq!(positions.len() % STRIDE, 0);
        debug_assert!(
            colors
                .as_ref()
                .is_none_or(|c| c.len() == positions.len())
        );
        Self {
            positions,
            colors,
            style,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len() / STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat position buffer, `len() * 3` floats.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat color buffer, `len() * 3` floats, if the cloud is colored.
    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    pub fn style(&self) -> PointStyle {
        self.style
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        let p = self.positions.get(triple(index)?)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    pub fn color(&self, index: usize) -> Option<Rgb> {
        let c = self.colors.as_ref()?.get(triple(index)?)?;
        Some(Rgb::new(c[0], c[1], c[2]))
    }

    /// Iterate over point positions in index order.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(STRIDE)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
    }
}

/// Buffer range of point `index`, or `None` when it cannot be addressed.
fn triple(index: usize) -> Option<std::ops::Range<usize>> {
    let start = index.checked_mul(STRIDE)?;
    Some(start..start.checked_add(STRIDE)?)
}
