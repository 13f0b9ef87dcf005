//! Transform gizmo attached to the selected item in the 3D view.
//!
//! Handles are polylines in world space around the item origin; hit
//! testing happens on their screen projection.

use crate::camera::OrbitCamera;
use glam::{Vec2, Vec3};
use room_core::ItemId;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

pub const AXIS_LENGTH: f32 = 1.5;
/// Inner and outer offsets of the square floor-plane handle.
pub const PLANE_HANDLE_SPAN: [f32; 2] = [0.3, 0.7];
pub const RING_RADIUS: f32 = 1.2;
const RING_SEGMENTS: usize = 48;
/// The uniform-scale knob floats above the item origin.
pub const SCALE_KNOB_HEIGHT: f32 = 1.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoHandle {
    AxisX,
    AxisZ,
    PlaneXZ,
    RingY,
    Uniform,
}

impl GizmoMode {
    pub fn handles(self) -> &'static [GizmoHandle] {
        match self {
            GizmoMode::Translate => &[GizmoHandle::AxisX, GizmoHandle::AxisZ, GizmoHandle::PlaneXZ],
            GizmoMode::Rotate => &[GizmoHandle::RingY],
            GizmoMode::Scale => &[GizmoHandle::Uniform],
        }
    }
}

impl GizmoHandle {
    /// World-space polyline of the handle around `origin`.
    pub fn outline(self, origin: Vec3) -> Vec<Vec3> {
        match self {
            GizmoHandle::AxisX => vec![origin, origin + Vec3::X * AXIS_LENGTH],
            GizmoHandle::AxisZ => vec![origin, origin + Vec3::Z * AXIS_LENGTH],
            GizmoHandle::PlaneXZ => {
                let [a, b] = PLANE_HANDLE_SPAN;
                vec![
                    origin + Vec3::new(a, 0.0, a),
                    origin + Vec3::new(b, 0.0, a),
                    origin + Vec3::new(b, 0.0, b),
                    origin + Vec3::new(a, 0.0, b),
                ]
            }
            GizmoHandle::RingY => (0..=RING_SEGMENTS)
                .map(|i| {
                    let angle = i as f32 / RING_SEGMENTS as f32 * TAU;
                    origin + Vec3::new(angle.sin(), 0.0, angle.cos()) * RING_RADIUS
                })
                .collect(),
            GizmoHandle::Uniform => vec![origin + Vec3::Y * SCALE_KNOB_HEIGHT],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandleShape {
    pub handle: GizmoHandle,
    pub points: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GizmoFrame {
    pub item: ItemId,
    pub mode: GizmoMode,
    pub origin: Vec3,
    pub active: Option<GizmoHandle>,
    pub handles: Vec<HandleShape>,
}

impl GizmoFrame {
    pub fn new(item: ItemId, mode: GizmoMode, origin: Vec3, active: Option<GizmoHandle>) -> Self {
        let handles = mode
            .handles()
            .iter()
            .map(|&handle| HandleShape {
                handle,
                points: handle.outline(origin),
            })
            .collect();
        Self {
            item,
            mode,
            origin,
            active,
            handles,
        }
    }
}

/// Handle under the pointer, nearest first, within `tolerance` pixels.
pub fn hit_handle(
    mode: GizmoMode,
    origin: Vec3,
    camera: &OrbitCamera,
    pointer: Vec2,
    tolerance: f32,
) -> Option<GizmoHandle> {
    mode.handles()
        .iter()
        .filter_map(|&handle| {
            let projected: Option<Vec<Vec2>> = handle
                .outline(origin)
                .into_iter()
                .map(|point| camera.project(point))
                .collect();
            let projected = projected?;
            let distance = match handle {
                GizmoHandle::PlaneXZ if point_in_polygon(pointer, &projected) => 0.0,
                GizmoHandle::PlaneXZ => closed_polyline_distance(pointer, &projected),
                GizmoHandle::Uniform => projected.first()?.distance(pointer),
                _ => polyline_distance(pointer, &projected),
            };
            (distance <= tolerance).then_some((handle, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(handle, _)| handle)
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 < 1.0e-9 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn polyline_distance(p: Vec2, points: &[Vec2]) -> f32 {
    match points {
        [] => f32::INFINITY,
        [single] => p.distance(*single),
        _ => points
            .windows(2)
            .map(|pair| segment_distance(p, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

fn closed_polyline_distance(p: Vec2, points: &[Vec2]) -> f32 {
    let closing = match (points.first(), points.last()) {
        (Some(first), Some(last)) => segment_distance(p, *last, *first),
        _ => f32::INFINITY,
    };
    polyline_distance(p, points).min(closing)
}

fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + n - 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}
