use super::Color;

/// Color used by `Material::default()`.
pub const DEFAULT_MATERIAL_COLOR: Color = Color::new(0.7, 0.7, 0.7);

/// Pattern cell size used by `Material::default()`, in reference-shape units.
pub const DEFAULT_PATTERN_GRID_SIZE: f32 = 0.5;

/// Surface appearance of a renderable.
///
/// Materials are values: every `with_*` method returns a modified copy and
/// leaves the receiver untouched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: Color,

    /// Draw the shape's triangle edges with the unlit shader instead of filling it.
    pub wireframe: bool,

    /// Cell size of the procedural surface pattern. `0` disables the pattern.
    ///
    /// The pattern is evaluated in reference-shape space, so it keeps its size
    /// when the renderable is scaled.
    pub pattern_grid_size: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: DEFAULT_MATERIAL_COLOR,
            wireframe: false,
            pattern_grid_size: DEFAULT_PATTERN_GRID_SIZE,
        }
    }
}

impl Material {
    #[inline]
    #[must_use]
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    #[inline]
    #[must_use]
    pub fn with_wireframe(self, wireframe: bool) -> Self {
        Self { wireframe, ..self }
    }

    #[inline]
    #[must_use]
    pub fn with_pattern_grid_size(self, pattern_grid_size: f32) -> Self {
        Self { pattern_grid_size, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_filled_neutral_gray() {
        let m = Material::default();
        assert_eq!(m.color, DEFAULT_MATERIAL_COLOR);
        assert!(!m.wireframe);
        assert_eq!(m.pattern_grid_size, DEFAULT_PATTERN_GRID_SIZE);
    }

    #[test]
    fn with_methods_leave_original_untouched() {
        let base = Material::default();
        let red = base.with_color(Color::RED).with_wireframe(true);

        assert_eq!(base, Material::default());
        assert_eq!(red.color, Color::RED);
        assert!(red.wireframe);
        assert_eq!(red.pattern_grid_size, base.pattern_grid_size);
    }
}
