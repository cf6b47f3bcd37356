use std::time::Duration;

use plinth_engine::glam::{Vec2, Vec3};
use plinth_engine::input::{Action, EventHandler, HandlerCtx, Key, Modifiers, MouseButton, Propagation};

/// Radians of rotation per logical pixel of mouse travel.
const LOOK_SENSITIVITY: f32 = 0.004;

/// Keeps the camera from flipping over the poles.
const PITCH_LIMIT: f32 = 1.5;

/// Fly camera: WASD / arrows move, Space / Shift go up / down, dragging with
/// the right mouse button looks around.
pub struct FlyController {
    /// World units per second.
    speed: f32,
    yaw: f32,
    pitch: f32,
    last_cursor: Option<Vec2>,
}

impl FlyController {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            yaw: 0.0,
            pitch: 0.0,
            last_cursor: None,
        }
    }

    /// Starts looking along `direction`.
    pub fn facing(mut self, direction: Vec3) -> Self {
        let d = direction.normalize_or(Vec3::NEG_Z);
        self.yaw = d.x.atan2(-d.z);
        self.pitch = d.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self
    }

    fn look_direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(sy * cp, sp, -cy * cp)
    }

    fn movement(ctx: &HandlerCtx<'_>) -> Vec3 {
        let input = ctx.input;
        let axis = |pos: &[Key], neg: &[Key]| {
            let p = pos.iter().any(|k| input.key_down(*k)) as i32;
            let n = neg.iter().any(|k| input.key_down(*k)) as i32;
            (p - n) as f32
        };

        let forward = axis(&[Key::W, Key::ArrowUp], &[Key::S, Key::ArrowDown]);
        let strafe = axis(&[Key::D, Key::ArrowRight], &[Key::A, Key::ArrowLeft]);
        let lift = axis(&[Key::Space], &[Key::Shift]);

        let camera = &*ctx.camera;
        camera.direction() * forward + camera.right() * strafe + Vec3::Y * lift
    }
}

impl EventHandler for FlyController {
    fn key_press(
        &mut self,
        ctx: &mut HandlerCtx<'_>,
        key: Key,
        action: Action,
        _modifiers: Modifiers,
    ) -> Propagation {
        // R resets the view; the key is consumed so the app never sees it.
        if key == Key::R && action == Action::Press {
            ctx.camera.set_position(Vec3::new(0.0, 1.5, 6.0));
            *self = Self::new(self.speed);
            ctx.camera.look_in(self.look_direction(), Vec3::Y);
            return Propagation::Stop;
        }
        Propagation::Continue
    }

    fn mouse_button_press(
        &mut self,
        _ctx: &mut HandlerCtx<'_>,
        button: MouseButton,
        action: Action,
        _modifiers: Modifiers,
    ) -> Propagation {
        if button == MouseButton::Right && !action.is_down() {
            self.last_cursor = None;
        }
        Propagation::Continue
    }

    fn cursor_moved(&mut self, ctx: &mut HandlerCtx<'_>, position: Vec2) -> Propagation {
        if !ctx.input.button_down(MouseButton::Right) {
            self.last_cursor = None;
            return Propagation::Continue;
        }

        if let Some(last) = self.last_cursor.replace(position) {
            let delta = position - last;
            self.yaw += delta.x * LOOK_SENSITIVITY;
            self.pitch = (self.pitch - delta.y * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            ctx.camera.look_in(self.look_direction(), Vec3::Y);
        }
        Propagation::Stop
    }

    fn before_frame(&mut self, ctx: &mut HandlerCtx<'_>, dt: Duration) {
        let motion = Self::movement(ctx);
        if motion == Vec3::ZERO {
            return;
        }
        let step = motion.normalize() * self.speed * dt.as_secs_f32();
        let position = ctx.camera.position() + step;
        ctx.camera.set_position(position);
    }

    fn after_frame(&mut self, _ctx: &mut HandlerCtx<'_>, frame_duration: Duration) {
        if frame_duration > Duration::from_millis(50) {
            log::debug!("slow frame: {frame_duration:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_round_trips_direction() {
        let dir = Vec3::new(1.0, 0.5, -2.0).normalize();
        let c = FlyController::new(1.0).facing(dir);
        assert!(c.look_direction().abs_diff_eq(dir, 1e-5));
    }

    #[test]
    fn default_looks_down_negative_z() {
        let c = FlyController::new(1.0);
        assert!(c.look_direction().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
