use glam::Vec2;

use crate::scene::{CommandBuffer, Renderable};

/// Flat rectangle in the local xy-plane, centered at the local origin.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rectangle {
    /// Side lengths along local x and y.
    pub extents: Vec2,
}

impl Rectangle {
    #[inline]
    pub const fn new(x_extent: f32, y_extent: f32) -> Self {
        Self { extents: Vec2::new(x_extent, y_extent) }
    }

    #[inline]
    pub const fn from_extents(extents: Vec2) -> Self {
        Self { extents }
    }
}

impl CommandBuffer {
    /// Records a rectangle.
    #[inline]
    pub fn push_rectangle(&mut self, renderable: Renderable<Rectangle>) {
        self.rectangles.push(renderable);
    }

    /// Rectangles in push order.
    #[inline]
    pub fn rectangles(&self) -> &[Renderable<Rectangle>] {
        &self.rectangles
    }

    #[inline]
    pub fn rectangles_mut(&mut self) -> &mut Vec<Renderable<Rectangle>> {
        &mut self.rectangles
    }
}
