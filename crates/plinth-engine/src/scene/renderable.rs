use glam::{Quat, Vec3};

use crate::paint::Material;

/// A shape placed in the world with a material.
///
/// Builder methods consume and return the value; nothing mutates in place.
/// `orientation` must be a unit quaternion: the renderer assumes a pure
/// rotation and does not re-normalize.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable<S> {
    pub shape: S,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
    pub material: Material,
}

impl<S> Renderable<S> {
    /// Shape at the origin, identity orientation, unit scale, default material.
    #[inline]
    pub fn new(shape: S) -> Self {
        Self {
            shape,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
            material: Material::default(),
        }
    }

    /// Same transform and material applied to another shape.
    #[inline]
    #[must_use]
    pub fn with_shape<T>(self, shape: T) -> Renderable<T> {
        Renderable {
            shape,
            position: self.position,
            orientation: self.orientation,
            scale: self.scale,
            material: self.material,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_position(self, position: Vec3) -> Self {
        Self { position, ..self }
    }

    #[inline]
    #[must_use]
    pub fn with_orientation(self, orientation: Quat) -> Self {
        debug_assert!(orientation.is_normalized(), "orientation must be a unit quaternion");
        Self { orientation, ..self }
    }

    #[inline]
    #[must_use]
    pub fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    #[inline]
    #[must_use]
    pub fn with_material(self, material: Material) -> Self {
        Self { material, ..self }
    }
}

/// Shorthand for [`Renderable::new`].
#[inline]
pub fn renderable<S>(shape: S) -> Renderable<S> {
    Renderable::new(shape)
}
