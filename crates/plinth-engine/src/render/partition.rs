use std::ops::Range;

use crate::scene::{Renderable, StaticMesh};

/// Moves wireframe renderables in front of filled ones, keeping the relative
/// order inside each group. Returns the number of wireframe renderables.
pub fn partition_wireframes<S>(bucket: &mut [Renderable<S>]) -> usize {
    bucket.sort_by_key(|r| !r.material.wireframe);
    bucket.partition_point(|r| r.material.wireframe)
}

/// Orders static meshes so renderables sharing mesh data are adjacent, and
/// returns the index range of each group. Order within a group is kept.
pub fn group_meshes(bucket: &mut [Renderable<StaticMesh>]) -> Vec<Range<usize>> {
    bucket.sort_by_key(|r| r.shape.id());

    let mut groups = Vec::new();
    let mut start = 0;
    for run in bucket.chunk_by(|a, b| a.shape.id() == b.shape.id()) {
        groups.push(start..start + run.len());
        start += run.len();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Material;
    use crate::scene::{renderable, Sphere};

    fn sphere(radius: f32, wireframe: bool) -> Renderable<Sphere> {
        renderable(Sphere::new(radius)).with_material(Material::default().with_wireframe(wireframe))
    }

    #[test]
    fn wireframes_come_first_in_stable_order() {
        let mut bucket = vec![
            sphere(0.0, false),
            sphere(1.0, true),
            sphere(2.0, false),
            sphere(3.0, true),
            sphere(4.0, false),
        ];

        let split = partition_wireframes(&mut bucket);
        assert_eq!(split, 2);
        assert!(bucket[..split].iter().all(|r| r.material.wireframe));
        assert!(bucket[split..].iter().all(|r| !r.material.wireframe));

        let radii: Vec<f32> = bucket.iter().map(|r| r.shape.radius).collect();
        assert_eq!(radii, vec![1.0, 3.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn no_wireframes() {
        let mut bucket = vec![sphere(0.0, false), sphere(1.0, false)];
        assert_eq!(partition_wireframes(&mut bucket), 0);
        let mut empty: Vec<Renderable<Sphere>> = Vec::new();
        assert_eq!(partition_wireframes(&mut empty), 0);
    }

    #[test]
    fn meshes_group_by_identity() {
        let a = StaticMesh::new(vec![0.0; 18], vec![0, 1, 2]);
        let b = StaticMesh::new(vec![0.0; 18], vec![0, 1, 2]);

        let mut bucket = vec![
            renderable(a.clone()).with_position(glam::Vec3::X),
            renderable(b.clone()),
            renderable(a.clone()).with_position(glam::Vec3::Y),
        ];

        let groups = group_meshes(&mut bucket);
        assert_eq!(groups.len(), 2);
        for g in &groups {
            let id = bucket[g.start].shape.id();
            assert!(bucket[g.clone()].iter().all(|r| r.shape.id() == id));
        }

        let a_group = groups.iter().find(|g| bucket[g.start].shape.ptr_eq(&a)).cloned();
        let a_group = a_group.map(|g| bucket[g].iter().map(|r| r.position).collect::<Vec<_>>());
        assert_eq!(a_group, Some(vec![glam::Vec3::X, glam::Vec3::Y]));
    }
}
