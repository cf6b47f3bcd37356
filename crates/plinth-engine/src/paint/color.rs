/// Linear RGB color.
///
/// Channels are expected in `[0, 1]`. The value is immutable in the sense that
/// no API mutates a `Color` in place; build a new one instead.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    r: f32,
    g: f32,
    b: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const GRAY: Self = Self::new(0.5, 0.5, 0.5);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from 8-bit channels (`0`–`255`).
    #[inline]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    #[inline]
    pub const fn r(self) -> f32 {
        self.r
    }

    #[inline]
    pub const fn g(self) -> f32 {
        self.g
    }

    #[inline]
    pub const fn b(self) -> f32 {
        self.b
    }

    #[inline]
    pub const fn into_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Returns `[r, g, b, 1.0]`, the layout used by uniform buffers.
    #[inline]
    pub const fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl From<[f32; 3]> for Color {
    #[inline]
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}
