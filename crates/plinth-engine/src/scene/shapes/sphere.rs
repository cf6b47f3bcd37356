use crate::scene::{CommandBuffer, Renderable};

/// Sphere centered at the local origin.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Sphere {
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub const fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl CommandBuffer {
    /// Records a sphere.
    #[inline]
    pub fn push_sphere(&mut self, renderable: Renderable<Sphere>) {
        self.spheres.push(renderable);
    }

    /// Spheres in push order.
    #[inline]
    pub fn spheres(&self) -> &[Renderable<Sphere>] {
        &self.spheres
    }

    #[inline]
    pub fn spheres_mut(&mut self) -> &mut Vec<Renderable<Sphere>> {
        &mut self.spheres
    }
}
