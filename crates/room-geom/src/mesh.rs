//! Triangle meshes for wall pieces and furniture primitives, tessellated
//! with Truck.

use glam::{EulerRot, Mat4, Quat, Vec3};
use room_core::{FurnitureItem, PrimitiveShape};
use serde::Serialize;
use truck_meshalgo::{filters::*, tessellation::*};
use truck_modeling::{builder, Point3, Solid, Vector3};
use truck_polymesh::{PolygonMesh, StandardAttributes, StandardVertex, TOLERANCE};

const TESSELLATION_TOLERANCE: f64 = 0.01;
const CONE_SEGMENTS: u32 = 32;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TriMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl TriMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn append_transformed(&mut self, other: &TriMesh, transform: Mat4) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions.iter().map(|p| {
            let p = Vec3::from_array(*p);
            transform.transform_point3(p).to_array()
        }));
        // Non-uniform scale needs the inverse transpose for normals.
        let normal_mat = transform.inverse().transpose();
        self.normals.extend(other.normals.iter().map(|n| {
            let n = normal_mat.transform_vector3(Vec3::from_array(*n));
            if n.length_squared() > 1.0e-12 {
                n.normalize().to_array()
            } else {
                [0.0, 1.0, 0.0]
            }
        }));
        self.indices
            .extend(other.indices.iter().copied().map(|idx| idx + base));
    }

    pub fn bounds(&self) -> Aabb {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &self.positions {
            let v = Vec3::from_array(*p);
            min = min.min(v);
            max = max.max(v);
        }
        if !min.is_finite() || !max.is_finite() {
            return Aabb::default();
        }
        Aabb {
            min: min.to_array(),
            max: max.to_array(),
        }
    }
}

/// Solid box of `size` meters (X width, Y height, Z depth) centered on the
/// item origin, so a primitive sits half below its placement height.
pub fn box_solid(size: Vec3) -> Solid {
    let size = size.as_dvec3().max(glam::DVec3::splat(1.0e-4));
    let corner = builder::vertex(Point3::new(-size.x / 2.0, -size.y / 2.0, -size.z / 2.0));
    let edge = builder::tsweep(&corner, Vector3::new(size.x, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, size.y, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, size.z))
}

/// Triangulates `solid` to within `tolerance` meters of its surface.
/// Triangles keep Truck's outward orientation (counter-clockwise seen from
/// outside); vertices are not shared between triangles.
pub fn tessellate(solid: &Solid, tolerance: f64) -> TriMesh {
    let mut poly = solid.triangulation(tolerance).to_polygon();
    poly.put_together_same_attrs(TOLERANCE * 10.0)
        .remove_degenerate_faces()
        .remove_unused_attrs();
    polygon_to_trimesh(&poly)
}

/// Unit cube centered at the origin; wall pieces scale it into place.
pub fn unit_box() -> TriMesh {
    tessellate(&box_solid(Vec3::ONE), TESSELLATION_TOLERANCE)
}

/// Fallback mesh for furniture without a model, centered at the origin.
pub fn primitive_mesh(shape: PrimitiveShape) -> TriMesh {
    match shape {
        PrimitiveShape::Box { w, h, d } => {
            tessellate(&box_solid(Vec3::new(w, h, d)), TESSELLATION_TOLERANCE)
        }
        PrimitiveShape::Cone { r, h } => cone_mesh(r, h, CONE_SEGMENTS),
    }
}

/// Upright cone with its base at `-h/2` and apex at `+h/2`.
pub fn cone_mesh(r: f32, h: f32, segments: u32) -> TriMesh {
    let segments = segments.max(3);
    let mut mesh = TriMesh::default();
    let apex = Vec3::new(0.0, h / 2.0, 0.0);
    let base_y = -h / 2.0;
    let slope = r / h.max(1.0e-6);

    for i in 0..segments {
        let a0 = i as f32 / segments as f32 * std::f32::consts::TAU;
        let a1 = (i + 1) as f32 / segments as f32 * std::f32::consts::TAU;
        let p0 = Vec3::new(r * a0.cos(), base_y, r * a0.sin());
        let p1 = Vec3::new(r * a1.cos(), base_y, r * a1.sin());
        let n0 = Vec3::new(a0.cos(), slope, a0.sin()).normalize();
        let n1 = Vec3::new(a1.cos(), slope, a1.sin()).normalize();
        let n_apex = (n0 + n1).normalize_or_zero();
        push_triangle(&mut mesh, [p0, apex, p1], [n0, n_apex, n1]);

        let center = Vec3::new(0.0, base_y, 0.0);
        push_triangle(&mut mesh, [center, p0, p1], [Vec3::NEG_Y; 3]);
    }
    mesh
}

/// Model matrix of a placed item: translate, then XYZ euler, then scale.
pub fn item_transform(item: &FurnitureItem) -> Mat4 {
    let [rx, ry, rz] = item.rotation;
    Mat4::from_scale_rotation_translation(
        Vec3::from_array(item.scale),
        Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
        Vec3::from_array(item.position),
    )
}

fn push_triangle(mesh: &mut TriMesh, points: [Vec3; 3], normals: [Vec3; 3]) {
    let base = mesh.positions.len() as u32;
    for (p, n) in points.iter().zip(normals.iter()) {
        mesh.positions.push(p.to_array());
        mesh.normals.push(n.to_array());
    }
    mesh.indices.extend([base, base + 1, base + 2]);
}

/// Flattens Truck's indexed polygon mesh into one triangle per three
/// vertices. Faces without a stored normal get their geometric normal.
fn polygon_to_trimesh(poly: &PolygonMesh<StandardVertex, StandardAttributes>) -> TriMesh {
    let attrs = poly.attributes();
    let to_vec3 = |p: Point3| Vec3::new(p.x as f32, p.y as f32, p.z as f32);
    let mut mesh = TriMesh::default();

    for tri in poly.faces().triangle_iter() {
        let points = [0, 1, 2].map(|i| to_vec3(attrs.positions[tri[i].pos]));
        let [a, b, c] = points;
        let geometric = (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Y);
        let normals = [0, 1, 2].map(|i| {
            tri[i]
                .nor
                .and_then(|idx| attrs.normals.get(idx))
                .map(|n| Vec3::new(n.x as f32, n.y as f32, n.z as f32))
                .unwrap_or(geometric)
        });
        push_triangle(&mut mesh, points, normals);
    }

    mesh
}
