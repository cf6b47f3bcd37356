use glam::{Affine3A, Mat3, Mat4, Quat, Vec3};

/// Vertical field of view (radians) of a newly created camera.
pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_2;

/// Projections of `approximate_up` shorter than this are treated as parallel
/// to the view direction.
const DEGENERATE_UP_EPSILON: f32 = 1e-6;

/// Camera with a rigid world transform.
///
/// Invariant: `rotation` is always a pure rotation (orthonormal, determinant
/// +1). Direction, up and right are derived from it on demand and never stored,
/// so they cannot drift out of sync.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    rotation: Mat3,
    position: Vec3,
    fov_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera at the origin looking down -Z with +Y up.
    pub fn new() -> Self {
        Self {
            rotation: Mat3::IDENTITY,
            position: Vec3::ZERO,
            fov_y: DEFAULT_FOV_Y,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit vector the camera looks along (local -Z in world space).
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    #[inline]
    pub fn orientation(&self) -> Quat {
        Quat::from_mat3(&self.rotation)
    }

    /// Vertical field of view in radians.
    #[inline]
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Camera-to-world transform.
    #[inline]
    pub fn transform(&self) -> Affine3A {
        Affine3A::from_mat3_translation(self.rotation, self.position)
    }

    /// World-to-camera transform (inverse of [`Camera::transform`]).
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from(self.transform().inverse())
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Replaces the orientation. `orientation` is normalized first so the
    /// rotation invariant holds even for slightly denormalized input.
    #[inline]
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.rotation = Mat3::from_quat(orientation.normalize());
    }

    #[inline]
    pub fn set_fov_y(&mut self, fov_y: f32) {
        debug_assert!(fov_y > 0.0 && fov_y < std::f32::consts::PI);
        self.fov_y = fov_y;
    }

    /// Orients the camera to look along `direction`, keeping its up axis as
    /// close to `approximate_up` as possible.
    ///
    /// `approximate_up` is made orthogonal to `direction` (Gram–Schmidt). When
    /// it is (nearly) parallel to `direction`, the world +Y axis is used
    /// instead, and world +Z when `direction` itself is vertical. The resulting
    /// basis `{right, up, -direction}` is always orthonormal.
    ///
    /// The position is unchanged. Calling this twice with the same arguments
    /// yields the same transform.
    pub fn look_in(&mut self, direction: Vec3, approximate_up: Vec3) {
        let forward = direction.normalize();
        let up = [approximate_up, Vec3::Y, Vec3::Z]
            .into_iter()
            .map(|candidate| candidate - candidate.dot(forward) * forward)
            .find(|projected| projected.length() > DEGENERATE_UP_EPSILON)
            .unwrap_or(Vec3::Y)
            .normalize();
        let right = forward.cross(up);

        self.rotation = Mat3::from_cols(right, up, -forward);
    }

    /// Orients the camera towards `target` as seen from the current position.
    pub fn look_at(&mut self, target: Vec3, approximate_up: Vec3) {
        self.look_in(target - self.position, approximate_up);
    }
}
