use glam::Vec3;

use crate::scene::{CommandBuffer, Renderable};

/// Axis-aligned box (in local space), centered at the local origin.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Cuboid {
    /// Side lengths along local x, y and z.
    pub extents: Vec3,
}

impl Cuboid {
    #[inline]
    pub const fn new(x_extent: f32, y_extent: f32, z_extent: f32) -> Self {
        Self { extents: Vec3::new(x_extent, y_extent, z_extent) }
    }

    #[inline]
    pub const fn from_extents(extents: Vec3) -> Self {
        Self { extents }
    }

    /// Cube with side length `side`.
    #[inline]
    pub const fn cube(side: f32) -> Self {
        Self::new(side, side, side)
    }
}

impl CommandBuffer {
    /// Records a box.
    #[inline]
    pub fn push_cuboid(&mut self, renderable: Renderable<Cuboid>) {
        self.cuboids.push(renderable);
    }

    /// Boxes in push order.
    #[inline]
    pub fn cuboids(&self) -> &[Renderable<Cuboid>] {
        &self.cuboids
    }

    #[inline]
    pub fn cuboids_mut(&mut self) -> &mut Vec<Renderable<Cuboid>> {
        &mut self.cuboids
    }
}
