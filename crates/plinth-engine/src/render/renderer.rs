use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::camera::{infinite_perspective, Camera, DEFAULT_FOV_Y};
use crate::coords::Viewport;
use crate::paint::Color;
use crate::scene::{CommandBuffer, Renderable};

use super::backend::{Culling, DrawCount, Geometry, PipelineKind, RenderBackend};
use super::cache::{CachePolicy, MeshCache};
use super::geometry::{unit_cube, unit_line, unit_rectangle, unit_sphere};
use super::partition::{group_meshes, partition_wireframes};
use super::primitive::{GarbagePile, GpuPrimitive};
use super::transform::{line_transform, model_transform, normal_transform, ReferenceShape};
use super::uniforms::{DrawUniforms, FrameUniforms};

/// Renderer settings fixed at startup.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    /// Vertical field of view given to newly created cameras (radians).
    pub fov_y: f32,
    pub near_plane: f32,
    pub light_color: Color,
    /// Direction pointing towards the light. Normalized on use.
    pub light_direction: Vec3,
    pub clear_color: Color,
    pub cache_policy: CachePolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fov_y: DEFAULT_FOV_Y,
            near_plane: 0.1,
            light_color: Color::WHITE,
            light_direction: Vec3::new(0.9, 1.2, -0.8),
            clear_color: Color::new(0.2, 0.3, 0.3),
            cache_policy: CachePolicy::KeepForever,
        }
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub pipeline_switches: u32,
    pub binds: u32,
    pub mesh_uploads: u32,
    /// GPU handles destroyed by this frame's garbage collection.
    pub destroyed: u32,
}

/// Turns a [`CommandBuffer`] into backend calls.
///
/// Owns the reference primitives (unit cube, rectangle, sphere, line) and the
/// static mesh cache. Every method that touches GPU resources takes the
/// backend, so nothing is created or freed without a current context.
pub struct Renderer<H: Copy> {
    config: RendererConfig,
    garbage: Rc<GarbagePile<H>>,

    cube: GpuPrimitive<H>,
    rectangle: GpuPrimitive<H>,
    sphere: GpuPrimitive<H>,
    line: GpuPrimitive<H>,

    meshes: MeshCache<H>,
}

impl<H: Copy> Renderer<H> {
    /// Uploads the reference primitives.
    pub fn new<B>(backend: &mut B, config: RendererConfig) -> Self
    where
        B: RenderBackend<Handle = H>,
    {
        let garbage = Rc::new(GarbagePile::new());

        let cube = GpuPrimitive::create(backend, &Geometry::triangles(&unit_cube()), &garbage);
        let rectangle =
            GpuPrimitive::create(backend, &Geometry::triangles(&unit_rectangle()), &garbage);
        let (sphere_vertices, sphere_indices) = unit_sphere();
        let sphere = GpuPrimitive::create(
            backend,
            &Geometry::indexed(&sphere_vertices, &sphere_indices),
            &garbage,
        );
        let line = GpuPrimitive::create(backend, &Geometry::lines(&unit_line()), &garbage);

        log::debug!("renderer: reference primitives uploaded");

        Self {
            config,
            meshes: MeshCache::new(Rc::clone(&garbage)),
            garbage,
            cube,
            rectangle,
            sphere,
            line,
        }
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn mesh_cache(&self) -> &MeshCache<H> {
        &self.meshes
    }

    /// Renders and then clears `buffer`.
    ///
    /// Buckets are drawn kind by kind: rectangles, boxes, spheres, static
    /// meshes, lines. Inside a bucket wireframes are drawn before filled
    /// shapes, each group in submission order. Static meshes sharing data are
    /// drawn consecutively under one bind; missing uploads are created here.
    pub fn render<B>(
        &mut self,
        backend: &mut B,
        buffer: &mut CommandBuffer,
        camera: &Camera,
        viewport: Viewport,
    ) -> FrameStats
    where
        B: RenderBackend<Handle = H>,
    {
        let mut stats = FrameStats::default();

        if self.config.cache_policy == CachePolicy::EvictUnreachable {
            self.meshes.evict_unreachable();
        }
        stats.destroyed = self.garbage.collect(backend) as u32;

        let projection =
            infinite_perspective(camera.fov_y(), viewport.aspect_ratio(), self.config.near_plane);
        backend.begin_frame(&FrameUniforms::new(
            projection,
            camera.view_matrix(),
            self.config.light_color,
            self.config.light_direction.normalize_or_zero(),
            camera.position(),
        ));

        let uploads_before = self.meshes.upload_count();
        let mut d = Dispatch::new(backend, &mut stats);

        // Rectangles are double sided; culling hides the face turned away.
        draw_bucket(&mut d, &self.rectangle, buffer.rectangles_mut(), Culling::Back);
        draw_bucket(&mut d, &self.cube, buffer.cuboids_mut(), Culling::None);
        draw_bucket(&mut d, &self.sphere, buffer.spheres_mut(), Culling::None);

        let meshes = buffer.meshes_mut();
        for group in group_meshes(meshes) {
            let bucket = &mut meshes[group];
            let primitive = self.meshes.get_or_create(d.backend, &bucket[0].shape);
            draw_bucket(&mut d, primitive, bucket, Culling::None);
        }

        let lines = buffer.lines();
        if !lines.is_empty() {
            d.set_pipeline(PipelineKind::Lines, Culling::None);
            d.bind(&self.line);
            for line in lines {
                let model = Mat4::from(line_transform(line));
                d.draw(&DrawUniforms::unlit(model, line.color), DrawCount::Vertices(2));
            }
            d.unbind();
        }

        stats.mesh_uploads = (self.meshes.upload_count() - uploads_before) as u32;
        buffer.clear();

        log::trace!("renderer: {stats:?}");
        stats
    }

    /// Destroys handles released since the last collection.
    pub fn collect_garbage<B>(&mut self, backend: &mut B) -> usize
    where
        B: RenderBackend<Handle = H>,
    {
        self.garbage.collect(backend)
    }

    /// Releases every GPU resource the renderer owns.
    pub fn shutdown<B>(self, backend: &mut B) -> usize
    where
        B: RenderBackend<Handle = H>,
    {
        let garbage = Rc::clone(&self.garbage);
        drop(self);
        let n = garbage.collect(backend);
        log::debug!("renderer: shut down, {n} GPU resources released");
        n
    }
}

/// Backend wrapper that skips redundant pipeline changes and counts calls.
struct Dispatch<'a, B: RenderBackend> {
    backend: &'a mut B,
    stats: &'a mut FrameStats,
    pipeline: Option<(PipelineKind, Culling)>,
}

impl<'a, B: RenderBackend> Dispatch<'a, B> {
    fn new(backend: &'a mut B, stats: &'a mut FrameStats) -> Self {
        Self { backend, stats, pipeline: None }
    }

    fn set_pipeline(&mut self, kind: PipelineKind, culling: Culling) {
        if self.pipeline == Some((kind, culling)) {
            return;
        }
        self.backend.set_pipeline(kind, culling);
        self.pipeline = Some((kind, culling));
        self.stats.pipeline_switches += 1;
    }

    fn bind(&mut self, primitive: &GpuPrimitive<B::Handle>) {
        primitive.bind(self.backend);
        self.stats.binds += 1;
    }

    fn unbind(&mut self) {
        self.backend.unbind();
    }

    fn draw(&mut self, uniforms: &DrawUniforms, count: DrawCount) {
        self.backend.draw(uniforms, count);
        self.stats.draw_calls += 1;
    }
}

fn draw_bucket<B, S>(
    d: &mut Dispatch<'_, B>,
    primitive: &GpuPrimitive<B::Handle>,
    bucket: &mut [Renderable<S>],
    culling: Culling,
) where
    B: RenderBackend,
    S: ReferenceShape,
{
    if bucket.is_empty() {
        return;
    }

    let split = partition_wireframes(bucket);
    let (wireframes, filled) = bucket.split_at(split);
    let count = primitive.draw_count();

    d.bind(primitive);

    if !wireframes.is_empty() {
        d.set_pipeline(PipelineKind::Wireframe, culling);
        for r in wireframes {
            let model = Mat4::from(model_transform(r));
            d.draw(&DrawUniforms::unlit(model, r.material.color), count);
        }
    }

    if !filled.is_empty() {
        d.set_pipeline(PipelineKind::Filled, culling);
        for r in filled {
            let model = model_transform(r);
            let uniforms = DrawUniforms::lit(
                Mat4::from(model),
                normal_transform(&model),
                r.shape.reference_transform(),
                r.material.color,
                r.material.pattern_grid_size,
            );
            d.draw(&uniforms, count);
        }
    }

    d.unbind();
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;
    use crate::paint::Material;
    use crate::render::testing::{Call, RecordingBackend};
    use crate::scene::{renderable, Cuboid, Line, Rectangle, Sphere, StaticMesh};

    const CUBE: u32 = 0;
    const RECTANGLE: u32 = 1;
    const LINE: u32 = 3;

    fn setup(config: RendererConfig) -> (RecordingBackend, Renderer<u32>) {
        let mut backend = RecordingBackend::new();
        let renderer = Renderer::new(&mut backend, config);
        (backend, renderer)
    }

    fn triangle() -> StaticMesh {
        StaticMesh::new(
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, //
                0.0, 1.0, 0.0, 0.0, 0.0, 1.0,
            ],
            vec![0, 1, 2],
        )
    }

    fn wire() -> Material {
        Material::default().with_wireframe(true)
    }

    /// Calls after `BeginFrame`.
    fn frame_calls(backend: &RecordingBackend) -> Vec<Call> {
        let start = backend.calls.iter().position(|c| matches!(c, Call::BeginFrame(_)));
        start.map(|i| backend.calls[i + 1..].to_vec()).unwrap_or_default()
    }

    // ── setup ──────────────────────────────────────────────────────────────

    #[test]
    fn new_uploads_reference_primitives() {
        let (backend, _renderer) = setup(RendererConfig::default());
        assert_eq!(backend.uploads(), 4);
        assert!(matches!(
            backend.calls[CUBE as usize],
            Call::Upload { vertices: 36, indices: None, .. }
        ));
        assert!(matches!(
            backend.calls[RECTANGLE as usize],
            Call::Upload { vertices: 12, indices: None, .. }
        ));
        assert!(matches!(backend.calls[2], Call::Upload { indices: Some(_), .. }));
        assert!(matches!(
            backend.calls[LINE as usize],
            Call::Upload { vertices: 2, topology: crate::render::Topology::Lines, .. }
        ));
    }

    #[test]
    fn empty_frame_only_begins() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let stats = renderer.render(
            &mut backend,
            &mut CommandBuffer::new(),
            &Camera::new(),
            Viewport::new(640, 480),
        );
        assert_eq!(stats, FrameStats::default());
        assert!(backend.frame_uniforms().is_some());
        assert!(frame_calls(&backend).is_empty());
    }

    // ── partitioning ───────────────────────────────────────────────────────

    #[test]
    fn wireframes_draw_first_under_one_bind() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        buf.push(renderable(Cuboid::cube(1.0)));
        buf.push(renderable(Cuboid::cube(1.0)).with_material(wire()));
        buf.push(renderable(Cuboid::cube(1.0)));

        let stats = renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));

        let calls = frame_calls(&backend);
        let kinds: Vec<&'static str> = calls
            .iter()
            .map(|c| match c {
                Call::Bind(_) => "bind",
                Call::SetPipeline(PipelineKind::Wireframe, _) => "wire",
                Call::SetPipeline(PipelineKind::Filled, _) => "filled",
                Call::Draw(..) => "draw",
                Call::Unbind => "unbind",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["bind", "wire", "draw", "filled", "draw", "draw", "unbind"]);
        assert_eq!(calls[0], Call::Bind(CUBE));
        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.pipeline_switches, 2);
        assert_eq!(stats.binds, 1);
    }

    #[test]
    fn same_pipeline_is_not_set_twice() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        buf.push(renderable(Cuboid::cube(1.0)));
        buf.push(renderable(Sphere::new(1.0)));

        let stats = renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
        assert_eq!(stats.pipeline_switches, 1);
        assert_eq!(stats.binds, 2);
    }

    #[test]
    fn rectangles_cull_back_faces() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        buf.push(renderable(Rectangle::new(1.0, 1.0)));
        buf.push(renderable(Cuboid::cube(1.0)));

        renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));

        let pipelines: Vec<Call> = frame_calls(&backend)
            .into_iter()
            .filter(|c| matches!(c, Call::SetPipeline(..)))
            .collect();
        assert_eq!(
            pipelines,
            [
                Call::SetPipeline(PipelineKind::Filled, Culling::Back),
                Call::SetPipeline(PipelineKind::Filled, Culling::None),
            ]
        );
    }

    // ── uniforms ───────────────────────────────────────────────────────────

    #[test]
    fn box_reference_transform_in_model() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        buf.push(renderable(Cuboid::new(2.0, 1.0, 1.0)));

        renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));

        let draws = backend.draws();
        assert_eq!(draws.len(), 1);
        let p = draws[0].0.model().transform_point3(Vec3::splat(0.5));
        assert!(p.abs_diff_eq(Vec3::new(1.0, 0.5, 0.5), 1e-6));
    }

    #[test]
    fn filled_draws_carry_material() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        let mat = Material::default().with_color(Color::RED).with_pattern_grid_size(0.25);
        buf.push(renderable(Sphere::new(2.0)).with_material(mat));

        renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));

        let (u, count) = backend.draws()[0];
        assert_eq!(u.color, Color::RED.to_rgba());
        assert_eq!(u.pattern_grid_size, 0.25);
        assert_eq!(u.reference_transform[1], [0.0, 2.0, 0.0, 0.0]);
        assert!(matches!(count, DrawCount::Indexed(_)));
    }

    #[test]
    fn light_direction_is_normalized() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        renderer.render(
            &mut backend,
            &mut CommandBuffer::new(),
            &Camera::new(),
            Viewport::new(8, 8),
        );
        let u = backend.frame_uniforms().unwrap_or_else(|| panic!("no frame"));
        let dir = Vec3::from_slice(&u.light_dir[..3]);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.abs_diff_eq(Vec3::new(0.9, 1.2, -0.8).normalize(), 1e-6));
    }

    // ── mesh cache ─────────────────────────────────────────────────────────

    #[test]
    fn same_mesh_uploads_once_across_frames() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mesh = triangle();
        let mut buf = CommandBuffer::new();

        let mut total_uploads = 0;
        for frame in 0..3 {
            buf.push(renderable(mesh.clone()));
            buf.push(renderable(mesh.clone()).with_position(Vec3::X));
            let stats =
                renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
            total_uploads += stats.mesh_uploads;
            assert_eq!(stats.draw_calls, 2, "frame {frame}");
            assert_eq!(stats.binds, 1, "frame {frame}");
        }

        assert_eq!(total_uploads, 1);
        assert_eq!(backend.uploads(), 5);
        assert_eq!(renderer.mesh_cache().upload_count(), 1);
    }

    #[test]
    fn distinct_meshes_upload_twice_and_group() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let a = triangle();
        let b = triangle();

        let mut buf = CommandBuffer::new();
        buf.push(renderable(a.clone()));
        buf.push(renderable(b.clone()));
        buf.push(renderable(a.clone()));
        buf.push(renderable(b.clone()));

        backend.reset();
        let stats = renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
        assert_eq!(stats.mesh_uploads, 2);
        assert_eq!(backend.uploads(), 2);
        assert_eq!(stats.binds, 2);

        // Each bind is followed by exactly the two draws of its group.
        let calls = frame_calls(&backend);
        let binds: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Bind(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(binds.len(), 2);
        for &i in &binds {
            let draws_after = calls[i + 1..]
                .iter()
                .take_while(|c| !matches!(c, Call::Bind(_)))
                .filter(|c| matches!(c, Call::Draw(..)))
                .count();
            assert_eq!(draws_after, 2);
        }
    }

    #[test]
    fn keep_forever_holds_unreachable_uploads() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        buf.push(renderable(triangle()));
        renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));

        let stats = renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
        assert_eq!(stats.destroyed, 0);
        assert_eq!(renderer.mesh_cache().len(), 1);
    }

    #[test]
    fn evict_unreachable_releases_dropped_meshes() {
        let config = RendererConfig { cache_policy: CachePolicy::EvictUnreachable, ..Default::default() };
        let (mut backend, mut renderer) = setup(config);
        let kept = triangle();

        let mut buf = CommandBuffer::new();
        buf.push(renderable(triangle()));
        buf.push(renderable(kept.clone()));
        renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
        assert_eq!(renderer.mesh_cache().len(), 2);

        let stats = renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
        assert_eq!(stats.destroyed, 1);
        assert_eq!(renderer.mesh_cache().len(), 1);
        assert!(renderer.mesh_cache().contains(kept.id()));
    }

    // ── lifecycle ──────────────────────────────────────────────────────────

    #[test]
    fn render_clears_buffer() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        buf.push(renderable(Sphere::new(1.0)));
        buf.push_line(Line::new(Vec3::ZERO, Vec3::Y));
        renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
        assert!(buf.is_empty());
    }

    #[test]
    fn shutdown_destroys_everything() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());
        let mut buf = CommandBuffer::new();
        buf.push(renderable(triangle()));
        renderer.render(&mut backend, &mut buf, &Camera::new(), Viewport::new(8, 8));
        assert_eq!(backend.live.len(), 5);

        let released = renderer.shutdown(&mut backend);
        assert_eq!(released, 5);
        assert!(backend.live.is_empty());
    }

    // ── end to end ─────────────────────────────────────────────────────────

    #[test]
    fn box_and_line_scene() {
        let (mut backend, mut renderer) = setup(RendererConfig::default());

        let mut camera = Camera::new();
        camera.set_position(Vec3::new(0.0, 0.0, 3.0));
        camera.look_in(Vec3::NEG_Z, Vec3::Y);

        let mut buf = CommandBuffer::new();
        buf.record(|frame| {
            frame.draw(renderable(Cuboid::cube(1.0)));
            frame.draw_line(Vec3::ZERO, Vec3::X, Color::WHITE);
        });

        backend.reset();
        let stats = renderer.render(&mut backend, &mut buf, &camera, Viewport::new(800, 600));
        assert_eq!(stats.draw_calls, 2);

        let draws = backend.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].1, DrawCount::Vertices(36));
        assert_eq!(draws[1].1, DrawCount::Vertices(2));

        let binds: Vec<Call> =
            backend.calls.iter().filter(|c| matches!(c, Call::Bind(_))).cloned().collect();
        assert_eq!(binds, [Call::Bind(CUBE), Call::Bind(LINE)]);

        let line_end = draws[1].0.model() * glam::Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(line_end.xyz().abs_diff_eq(Vec3::X, 1e-6));

        let frame = backend.frame_uniforms().unwrap_or_else(|| panic!("no frame"));
        let expected = Mat4::perspective_infinite_rh(camera.fov_y(), 800.0 / 600.0, 0.1);
        assert_eq!(frame.projection(), expected);
        assert!(frame
            .view()
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-6));
        assert_eq!(frame.camera_pos, [0.0, 0.0, 3.0, 1.0]);
    }
}
