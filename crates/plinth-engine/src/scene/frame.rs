use std::marker::PhantomData;

use glam::Vec3;

use crate::paint::Color;

use super::shapes::{Line, Shape};
use super::{CommandBuffer, Renderable};

/// Per-frame drawing handle.
///
/// Obtained only through [`CommandBuffer::record`]; it borrows the buffer for
/// the duration of one render callback. Not `Clone`, `Send` or `Sync`.
#[derive(Debug)]
pub struct Frame<'a> {
    buffer: &'a mut CommandBuffer,
    _not_send: PhantomData<*const ()>,
}

impl<'a> Frame<'a> {
    #[inline]
    pub(in crate::scene) fn new(buffer: &'a mut CommandBuffer) -> Self {
        Self { buffer, _not_send: PhantomData }
    }

    /// Queues a renderable for this frame.
    #[inline]
    pub fn draw<S: Shape>(&mut self, renderable: Renderable<S>) {
        self.buffer.push(renderable);
    }

    /// Queues an unlit line segment.
    #[inline]
    pub fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.buffer.push_line(Line { from, to, color });
    }

    #[inline]
    pub fn draw_line_segment(&mut self, line: Line) {
        self.buffer.push_line(line);
    }

    /// Number of items recorded so far this frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
