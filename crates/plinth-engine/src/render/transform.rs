//! Model, normal and reference transforms.

use glam::{Affine3A, Mat3, Quat, Vec3};

use crate::scene::{Cuboid, Line, Rectangle, Renderable, Sphere, StaticMesh};

/// Maps a shape's unit reference primitive onto the shape's own size.
pub trait ReferenceShape {
    fn reference_transform(&self) -> Mat3;
}

impl ReferenceShape for Rectangle {
    #[inline]
    fn reference_transform(&self) -> Mat3 {
        Mat3::from_diagonal(self.extents.extend(1.0))
    }
}

impl ReferenceShape for Cuboid {
    #[inline]
    fn reference_transform(&self) -> Mat3 {
        Mat3::from_diagonal(self.extents)
    }
}

impl ReferenceShape for Sphere {
    #[inline]
    fn reference_transform(&self) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(self.radius))
    }
}

impl ReferenceShape for StaticMesh {
    #[inline]
    fn reference_transform(&self) -> Mat3 {
        Mat3::IDENTITY
    }
}

/// `translate(position) · rotate(orientation) · scale(scale) · reference`.
pub fn model_transform<S: ReferenceShape>(r: &Renderable<S>) -> Affine3A {
    let linear = Mat3::from_quat(r.orientation)
        * Mat3::from_diagonal(r.scale)
        * r.shape.reference_transform();
    Affine3A::from_mat3_translation(linear, r.position)
}

/// Inverse-transpose of the model's linear part.
///
/// Keeps normals perpendicular to surfaces under non-uniform scale.
#[inline]
pub fn normal_transform(model: &Affine3A) -> Mat3 {
    Mat3::from(model.matrix3).inverse().transpose()
}

/// Maps the unit line `(0,0,0)-(1,0,0)` onto `line`.
///
/// A zero-length line produces a degenerate transform; callers must not
/// submit one.
pub fn line_transform(line: &Line) -> Affine3A {
    let delta = line.direction();
    let length = delta.length();
    let rotation = Quat::from_rotation_arc(Vec3::X, delta / length);
    Affine3A::from_scale_rotation_translation(Vec3::splat(length), rotation, line.from)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::scene::renderable;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    // ── reference transforms ───────────────────────────────────────────────

    #[test]
    fn box_extents_scale_unit_cube() {
        let m = model_transform(&renderable(Cuboid::new(2.0, 1.0, 1.0)));
        assert!(approx(m.transform_point3(Vec3::splat(0.5)), Vec3::new(1.0, 0.5, 0.5)));
    }

    #[test]
    fn rectangle_keeps_z() {
        let r = Rectangle::from_extents(Vec2::new(4.0, 2.0));
        assert_eq!(r.reference_transform(), Mat3::from_diagonal(Vec3::new(4.0, 2.0, 1.0)));
    }

    #[test]
    fn sphere_scales_by_radius() {
        let m = model_transform(&renderable(Sphere::new(3.0)));
        assert!(approx(m.transform_point3(Vec3::Y), Vec3::new(0.0, 3.0, 0.0)));
    }

    // ── model transform ────────────────────────────────────────────────────

    #[test]
    fn scale_then_rotate_then_translate() {
        let r = renderable(Cuboid::cube(1.0))
            .with_scale(Vec3::new(2.0, 1.0, 1.0))
            .with_orientation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2))
            .with_position(Vec3::new(0.0, 0.0, 5.0));

        // x scaled to 2, rotated onto +y, then moved along z.
        let p = model_transform(&r).transform_point3(Vec3::X);
        assert!(approx(p, Vec3::new(0.0, 2.0, 5.0)));
    }

    #[test]
    fn normal_transform_stays_perpendicular() {
        let r = renderable(Cuboid::cube(1.0)).with_scale(Vec3::new(4.0, 1.0, 1.0));
        let model = model_transform(&r);
        let n = normal_transform(&model);

        // Tangent of a slanted surface and its normal.
        let tangent = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::new(1.0, 1.0, 0.0);
        let t_world = model.transform_vector3(tangent);
        let n_world = n * normal;
        assert!(t_world.dot(n_world).abs() < 1e-5);
    }

    // ── lines ──────────────────────────────────────────────────────────────

    #[test]
    fn line_transform_hits_both_endpoints() {
        let line = Line::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, -1.0));
        let m = line_transform(&line);
        assert!(approx(m.transform_point3(Vec3::ZERO), line.from));
        assert!(approx(m.transform_point3(Vec3::X), line.to));
    }

    #[test]
    fn line_along_negative_x() {
        let line = Line::new(Vec3::ZERO, Vec3::new(-2.0, 0.0, 0.0));
        let m = line_transform(&line);
        assert!(approx(m.transform_point3(Vec3::X), line.to));
    }
}
