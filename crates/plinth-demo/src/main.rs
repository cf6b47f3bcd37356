mod controller;

use anyhow::Result;

use plinth_engine::device::GpuInit;
use plinth_engine::glam::{Quat, Vec3};
use plinth_engine::input::{Action, InputEvent, Key};
use plinth_engine::logging::{init_logging, LoggingConfig};
use plinth_engine::{
    renderable, App, AppControl, Color, Cuboid, FrameCtx, Material, Rectangle, Runtime,
    RuntimeConfig, SetupCtx, Sphere, StaticMesh,
};
use winit::window::WindowId;

use controller::FlyController;

/// Flat-shaded tetrahedron; every face gets its own three vertices.
fn tetrahedron() -> StaticMesh {
    let corners = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];
    let faces = [[0, 1, 3], [0, 2, 1], [0, 3, 2], [1, 2, 3]];

    let mut floats = Vec::with_capacity(faces.len() * 3 * 6);
    for face in faces {
        let [a, b, c] = face.map(|i| corners[i] * 0.5);
        let normal = (b - a).cross(c - a).normalize();
        for p in [a, b, c] {
            floats.extend_from_slice(&[p.x, p.y, p.z, normal.x, normal.y, normal.z]);
        }
    }
    let indices = (0..floats.len() as u32 / 6).collect();

    StaticMesh::new(floats, indices)
}

struct Showcase {
    mesh: StaticMesh,
    elapsed: f32,
    wireframe_all: bool,
}

impl Showcase {
    fn new() -> Self {
        Self {
            mesh: tetrahedron(),
            elapsed: 0.0,
            wireframe_all: false,
        }
    }
}

impl App for Showcase {
    fn setup(&mut self, ctx: &mut SetupCtx<'_>) {
        let eye = Vec3::new(0.0, 1.5, 6.0);
        ctx.camera.set_position(eye);
        ctx.camera.look_at(Vec3::ZERO, Vec3::Y);
        ctx.add_handler(FlyController::new(3.0).facing(-eye));
    }

    fn on_input(&mut self, _window_id: WindowId, event: &InputEvent) -> AppControl {
        match event {
            InputEvent::Key { key: Key::Escape, action: Action::Press, .. } => AppControl::Exit,
            InputEvent::Key { key: Key::F, action: Action::Press, .. } => {
                self.wireframe_all = !self.wireframe_all;
                log::info!("wireframe: {}", self.wireframe_all);
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.elapsed += ctx.time.dt_secs();
        let t = self.elapsed;
        let wire = self.wireframe_all;
        let mesh = &self.mesh;

        ctx.render(|frame| {
            // Floor.
            frame.draw(
                renderable(Rectangle::new(12.0, 12.0))
                    .with_orientation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
                    .with_material(Material::default().with_color(Color::GRAY).with_wireframe(wire)),
            );

            frame.draw(
                renderable(Cuboid::new(1.0, 1.0, 1.0))
                    .with_position(Vec3::new(-2.0, 0.5, 0.0))
                    .with_orientation(Quat::from_rotation_y(t * 0.5))
                    .with_material(Material::default().with_color(Color::RED).with_wireframe(wire)),
            );
            frame.draw(
                renderable(Cuboid::new(2.0, 0.5, 1.0))
                    .with_position(Vec3::new(2.0, 0.25, 0.0))
                    .with_material(Material::default().with_color(Color::GREEN).with_wireframe(true)),
            );

            frame.draw(
                renderable(Sphere::new(0.75))
                    .with_position(Vec3::new(0.0, 0.75 + (t * 2.0).sin().abs(), -1.5))
                    .with_material(
                        Material::default()
                            .with_color(Color::new(0.2, 0.4, 0.9))
                            .with_pattern_grid_size(0.25)
                            .with_wireframe(wire),
                    ),
            );

            // The same mesh drawn several times; it is uploaded once.
            for i in 0..4 {
                let angle = t + i as f32 * std::f32::consts::FRAC_PI_2;
                let pos = Vec3::new(angle.cos() * 3.5, 1.0, angle.sin() * 3.5);
                frame.draw(
                    renderable(mesh.clone())
                        .with_position(pos)
                        .with_orientation(Quat::from_rotation_y(angle * 2.0))
                        .with_material(
                            Material::default()
                                .with_color(Color::new(0.9, 0.7, 0.2))
                                .with_pattern_grid_size(0.0)
                                .with_wireframe(wire || i % 2 == 1),
                        ),
                );
            }

            // Axes.
            frame.draw_line(Vec3::ZERO, Vec3::X * 2.0, Color::RED);
            frame.draw_line(Vec3::ZERO, Vec3::Y * 2.0, Color::GREEN);
            frame.draw_line(Vec3::ZERO, Vec3::Z * 2.0, Color::BLUE);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "plinth demo".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Showcase::new())
}
