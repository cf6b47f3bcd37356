//! Shape value types.
//!
//! The set of shapes is closed. Each shape type is routed to its own bucket in
//! the [`CommandBuffer`](crate::scene::CommandBuffer) through the sealed
//! [`Shape`] trait, so a shape can never land in another kind's bucket.

mod cuboid;
mod line;
mod rectangle;
mod sphere;
mod static_mesh;

pub use cuboid::Cuboid;
pub use line::Line;
pub use rectangle::Rectangle;
pub use sphere::Sphere;
pub use static_mesh::{MeshData, MeshId, StaticMesh, Vertex};

use crate::scene::{CommandBuffer, Renderable};

mod sealed {
    pub trait Sealed {}
}

/// A drawable shape with a dedicated command-buffer bucket.
///
/// Implemented for [`Rectangle`], [`Cuboid`], [`Sphere`] and [`StaticMesh`].
/// This trait is sealed; the renderer only knows how to draw these kinds.
pub trait Shape: Sized + sealed::Sealed {
    /// Human-readable kind name, used in diagnostics.
    const KIND: &'static str;

    #[doc(hidden)]
    fn bucket(buffer: &CommandBuffer) -> &[Renderable<Self>];

    #[doc(hidden)]
    fn bucket_mut(buffer: &mut CommandBuffer) -> &mut Vec<Renderable<Self>>;
}

macro_rules! impl_shape {
    ($shape:ty, $kind:literal, $field:ident) => {
        impl sealed::Sealed for $shape {}

        impl Shape for $shape {
            const KIND: &'static str = $kind;

            #[inline]
            fn bucket(buffer: &CommandBuffer) -> &[Renderable<Self>] {
                &buffer.$field
            }

            #[inline]
            fn bucket_mut(buffer: &mut CommandBuffer) -> &mut Vec<Renderable<Self>> {
                &mut buffer.$field
            }
        }
    };
}

impl_shape!(Rectangle, "rectangle", rectangles);
impl_shape!(Cuboid, "box", cuboids);
impl_shape!(Sphere, "sphere", spheres);
impl_shape!(StaticMesh, "static mesh", meshes);
