/// Drawable size in device (physical) pixels.
///
/// The renderer derives the projection's aspect ratio from this value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns `width / height`, or `1.0` for a degenerate (zero-sized) viewport.
    ///
    /// A minimized window reports a zero size; that is a valid state and must
    /// not poison the projection with infinities.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if self.is_valid() {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }
}
