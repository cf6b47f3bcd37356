use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

use crate::paint::Color;

/// Per-frame shader inputs (binding 0).
///
/// WGSL layout: two `mat4x4<f32>`, then three `vec3<f32>` each padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub light_color: [f32; 4],
    pub light_dir: [f32; 4],
    pub camera_pos: [f32; 4],
}

impl FrameUniforms {
    pub fn new(
        projection: Mat4,
        view: Mat4,
        light_color: Color,
        light_dir: Vec3,
        camera_pos: Vec3,
    ) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            light_color: light_color.to_rgba(),
            light_dir: light_dir.extend(0.0).to_array(),
            camera_pos: camera_pos.extend(1.0).to_array(),
        }
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view)
    }
}

/// Per-draw shader inputs (binding 1, dynamic offset).
///
/// `mat3x3<f32>` in WGSL has 16-byte columns, hence `[[f32; 4]; 3]`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_transform: [[f32; 4]; 3],
    pub reference_transform: [[f32; 4]; 3],
    pub color: [f32; 4],
    pub pattern_grid_size: f32,
    pub _pad: [f32; 3],
}

impl DrawUniforms {
    /// Uniforms for the unlit shader: only model and color are read.
    pub fn unlit(model: Mat4, color: Color) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_transform: mat3_columns(Mat3::IDENTITY),
            reference_transform: mat3_columns(Mat3::IDENTITY),
            color: color.to_rgba(),
            pattern_grid_size: 0.0,
            _pad: [0.0; 3],
        }
    }

    /// Uniforms for the lit mesh shader.
    pub fn lit(
        model: Mat4,
        normal_transform: Mat3,
        reference_transform: Mat3,
        color: Color,
        pattern_grid_size: f32,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_transform: mat3_columns(normal_transform),
            reference_transform: mat3_columns(reference_transform),
            color: color.to_rgba(),
            pattern_grid_size: pattern_grid_size.max(0.0),
            _pad: [0.0; 3],
        }
    }

    #[inline]
    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

fn mat3_columns(m: Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 176);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 192);
    }

    #[test]
    fn negative_grid_size_is_clamped() {
        let u = DrawUniforms::lit(Mat4::IDENTITY, Mat3::IDENTITY, Mat3::IDENTITY, Color::WHITE, -2.0);
        assert_eq!(u.pattern_grid_size, 0.0);
    }

    #[test]
    fn matrices_round_trip() {
        let p = Mat4::perspective_infinite_rh(1.0, 1.5, 0.1);
        let v = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        let u = FrameUniforms::new(p, v, Color::WHITE, Vec3::Y, Vec3::Z);
        assert_eq!(u.projection(), p);
        assert_eq!(u.view(), v);
    }
}
