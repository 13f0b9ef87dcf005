//! Ray casting against placed furniture.

use crate::mesh::{item_transform, primitive_mesh, TriMesh};
use glam::Vec3;
use room_core::{FurnitureItem, FurnitureKind, ItemId, PrimitiveShape};
use std::collections::HashMap;

/// Height of the pick proxy used for model-backed items.
const MODEL_PROXY_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Intersection with the horizontal plane `y = height`, in front of the
    /// ray origin only.
    pub fn hit_horizontal_plane(&self, height: f32) -> Option<Vec3> {
        if self.dir.y.abs() < 1.0e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.dir.y;
        (t > 0.0).then(|| self.at(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemHit {
    pub item: ItemId,
    pub point: Vec3,
    pub distance: f32,
}

/// Picks items by their fallback primitive (or a footprint box for
/// model-backed kinds). Local meshes are tessellated once per kind.
#[derive(Debug, Default)]
pub struct ItemPicker {
    meshes: HashMap<FurnitureKind, TriMesh>,
}

impl ItemPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick(&mut self, items: &[FurnitureItem], ray: Ray) -> Option<ItemHit> {
        if ray.dir.length_squared() < 1.0e-12 {
            return None;
        }
        let mut best: Option<ItemHit> = None;
        for item in items {
            let transform = item_transform(item);
            let mesh = self
                .meshes
                .entry(item.kind.clone())
                .or_insert_with(|| proxy_mesh(&item.kind));

            for tri in mesh.indices.chunks_exact(3) {
                let (Some(p0), Some(p1), Some(p2)) = (
                    mesh.positions.get(tri[0] as usize),
                    mesh.positions.get(tri[1] as usize),
                    mesh.positions.get(tri[2] as usize),
                ) else {
                    continue;
                };
                let p0 = transform.transform_point3(Vec3::from_array(*p0));
                let p1 = transform.transform_point3(Vec3::from_array(*p1));
                let p2 = transform.transform_point3(Vec3::from_array(*p2));
                let Some(t) = hit_triangle(&ray, [p0, p1, p2]) else {
                    continue;
                };
                if best.map_or(true, |hit| t < hit.distance) {
                    best = Some(ItemHit {
                        item: item.id,
                        point: ray.at(t),
                        distance: t,
                    });
                }
            }
        }
        best
    }
}

/// Local pick mesh: the primitive itself, or for model-backed kinds a box
/// over the blueprint footprint resting on the item origin.
pub fn proxy_mesh(kind: &FurnitureKind) -> TriMesh {
    if kind.model().is_none() {
        return primitive_mesh(kind.primitive());
    }
    let (w, d) = kind.footprint();
    let local = primitive_mesh(PrimitiveShape::Box {
        w,
        h: MODEL_PROXY_HEIGHT,
        d,
    });
    let mut lifted = TriMesh::default();
    lifted.append_transformed(
        &local,
        glam::Mat4::from_translation(Vec3::new(0.0, MODEL_PROXY_HEIGHT / 2.0, 0.0)),
    );
    lifted
}

/// Distance along `ray` to a furniture triangle in world meters, or `None`
/// on a miss. Both faces count, since a camera inside an item still has to
/// pick it.
fn hit_triangle(ray: &Ray, [a, b, c]: [Vec3; 3]) -> Option<f32> {
    const PARALLEL: f32 = 1.0e-6;
    let ab = b - a;
    let ac = c - a;
    let p = ray.dir.cross(ac);
    let det = ab.dot(p);
    if det.abs() < PARALLEL {
        return None;
    }
    let to_origin = ray.origin - a;
    let u = to_origin.dot(p) / det;
    let q = to_origin.cross(ab);
    let v = ray.dir.dot(q) / det;
    if u < 0.0 || v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = ac.dot(q) / det;
    (t > PARALLEL).then_some(t)
}
