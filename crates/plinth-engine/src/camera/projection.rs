use glam::Mat4;

/// Right-handed perspective projection with the far plane at infinity.
///
/// Maps view space (camera looking down -Z) to wgpu clip space with depth in
/// `[0, 1]`: the near plane lands on depth 0 and points infinitely far away
/// approach depth 1. Dropping the far plane removes far-clip popping at the
/// cost of depth precision for very distant geometry.
pub fn infinite_perspective(fov_y: f32, aspect_ratio: f32, near: f32) -> Mat4 {
    debug_assert!(fov_y > 0.0);
    debug_assert!(aspect_ratio > 0.0);
    debug_assert!(near > 0.0);

    Mat4::perspective_infinite_rh(fov_y, aspect_ratio, near)
}

#[cfg(test)]
mod tests {
    use glam::{Vec3, Vec4};

    use super::*;

    fn depth_of(p: Mat4, z: f32) -> f32 {
        let clip = p * Vec4::new(0.0, 0.0, z, 1.0);
        clip.z / clip.w
    }

    #[test]
    fn near_plane_maps_to_zero_depth() {
        let p = infinite_perspective(1.0, 1.5, 0.1);
        assert!(depth_of(p, -0.1).abs() < 1e-6);
    }

    #[test]
    fn distant_points_approach_unit_depth() {
        let p = infinite_perspective(1.0, 1.5, 0.1);
        let d = depth_of(p, -1.0e6);
        assert!(d < 1.0 && d > 0.999);
    }

    #[test]
    fn aspect_ratio_scales_horizontal_axis() {
        let square = infinite_perspective(1.0, 1.0, 0.1);
        let wide = infinite_perspective(1.0, 2.0, 0.1);
        let p = Vec3::new(1.0, 1.0, -5.0);
        let a = square.project_point3(p);
        let b = wide.project_point3(p);
        assert!((a.x - 2.0 * b.x).abs() < 1e-5);
        assert!((a.y - b.y).abs() < 1e-5);
    }
}
