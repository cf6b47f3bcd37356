use glam::Vec3;

use crate::paint::Color;
use crate::scene::CommandBuffer;

/// Unlit line segment in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Line {
    pub from: Vec3,
    pub to: Vec3,
    pub color: Color,
}

impl Line {
    /// White segment from `from` to `to`.
    #[inline]
    pub const fn new(from: Vec3, to: Vec3) -> Self {
        Self { from, to, color: Color::WHITE }
    }

    #[inline]
    #[must_use]
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }
}

impl CommandBuffer {
    /// Records a line segment.
    #[inline]
    pub fn push_line(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Lines in push order.
    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[inline]
    pub fn lines_mut(&mut self) -> &mut Vec<Line> {
        &mut self.lines
    }
}
