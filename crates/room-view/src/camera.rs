//! Orbit camera for the 3D view: arcball orbit, pan, zoom and pointer rays.

use crate::config::CameraSettings;
use glam::{Mat3, Mat4, Quat, Vec2, Vec3};
use room_geom::Ray;

/// Orbit camera around a target point. Orientation is a quaternion whose
/// local +Z points from the target to the eye.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    radius: f32,
    rotation: Quat,
    viewport: Vec2,
    enabled: bool,
    settings: CameraSettings,
}

impl OrbitCamera {
    pub fn new(settings: CameraSettings, viewport: Vec2) -> Self {
        let target = Vec3::from_array(settings.target);
        let offset = Vec3::from_array(settings.eye) - target;
        let back = offset.try_normalize().unwrap_or(Vec3::new(0.0, 1.0, 1.0).normalize());
        let mut camera = Self {
            target,
            radius: offset.length(),
            rotation: orientation_from_back(back, Quat::IDENTITY),
            viewport: sanitize_viewport(viewport),
            enabled: true,
            settings,
        };
        camera.radius = camera.clamp_radius(camera.radius);
        camera.constrain_up();
        camera
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.rotation * Vec3::new(0.0, 0.0, self.radius)
    }

    /// Angle between the view direction and straight down, in radians.
    pub fn polar_angle(&self) -> f32 {
        (self.rotation * Vec3::Z).normalize().y.clamp(-1.0, 1.0).acos()
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = sanitize_viewport(viewport);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled camera ignores orbit, pan and zoom input.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn view(&self) -> Mat4 {
        let up = self.rotation * Vec3::Y;
        Mat4::look_at_rh(self.eye(), self.target, up)
    }

    pub fn projection(&self) -> Mat4 {
        let aspect = (self.viewport.x / self.viewport.y).max(0.01);
        Mat4::perspective_rh(
            self.settings.fov_y_degrees.to_radians(),
            aspect,
            self.settings.near,
            self.settings.far,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn orbit_arcball(&mut self, prev: Vec2, curr: Vec2) -> bool {
        if !self.enabled {
            return false;
        }
        let v0 = arcball_vector(prev, self.viewport);
        let v1 = arcball_vector(curr, self.viewport);
        // Inverted so the scene follows the pointer.
        let axis = v1.cross(v0);
        let axis_len = axis.length();
        if axis_len < 1.0e-5 {
            return false;
        }
        let angle = v0.dot(v1).clamp(-1.0, 1.0).acos();
        let q = Quat::from_axis_angle(axis / axis_len, angle);
        self.rotation = (self.rotation * q).normalize();
        self.constrain_up();
        true
    }

    pub fn pan(&mut self, delta: Vec2) -> bool {
        if !self.enabled {
            return false;
        }
        let right = (self.rotation * Vec3::X).normalize();
        let up = (self.rotation * Vec3::Y).normalize();
        let scale = self.radius * self.settings.pan_speed;
        self.target += (-right * delta.x + up * delta.y) * scale;
        true
    }

    pub fn zoom(&mut self, delta: f32) -> bool {
        if !self.enabled || !delta.is_finite() {
            return false;
        }
        let factor = (1.0 + delta * self.settings.zoom_speed).max(0.05);
        self.radius = self.clamp_radius(self.radius * factor);
        true
    }

    /// World ray through a pointer position in surface pixels.
    pub fn ray(&self, pointer: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * pointer.x / self.viewport.x - 1.0,
            1.0 - 2.0 * pointer.y / self.viewport.y,
        );
        let far = self
            .view_proj()
            .inverse()
            .project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let eye = self.eye();
        Ray::new(eye, far - eye)
    }

    /// Surface pixel position of a world point, `None` when it is behind
    /// the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_proj() * point.extend(1.0);
        if clip.w <= 1.0e-6 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }

    fn clamp_radius(&self, radius: f32) -> f32 {
        let min = self.settings.min_distance.max(0.01);
        let max = self.settings.max_distance.max(min);
        if radius.is_finite() {
            radius.clamp(min, max)
        } else {
            max
        }
    }

    /// Removes roll and keeps the eye above the horizon margin.
    fn constrain_up(&mut self) {
        let mut back = (self.rotation * Vec3::Z).normalize();
        let min_y = self.settings.horizon_margin.clamp(0.0, 1.5).sin();
        if back.y < min_y {
            let flat = Vec2::new(back.x, back.z)
                .try_normalize()
                .unwrap_or(Vec2::Y);
            let horizontal = (1.0 - min_y * min_y).sqrt();
            back = Vec3::new(flat.x * horizontal, min_y, flat.y * horizontal);
        }
        self.rotation = orientation_from_back(back, self.rotation);
    }
}

fn orientation_from_back(back: Vec3, fallback: Quat) -> Quat {
    let world_up = Vec3::Y;
    let mut right = world_up.cross(back);
    if right.length_squared() < 1.0e-6 {
        right = (fallback * Vec3::X).normalize();
    } else {
        right = right.normalize();
    }
    let mut up = back.cross(right).normalize();
    if up.dot(world_up) < 0.0 {
        right = -right;
        up = -up;
    }
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}

fn arcball_vector(pointer: Vec2, viewport: Vec2) -> Vec3 {
    let nx = (2.0 * pointer.x - viewport.x) / viewport.x;
    let ny = (viewport.y - 2.0 * pointer.y) / viewport.y;
    let len2 = nx * nx + ny * ny;
    if len2 <= 1.0 {
        Vec3::new(nx, ny, (1.0 - len2).sqrt())
    } else {
        let norm = len2.sqrt();
        Vec3::new(nx / norm, ny / norm, 0.0)
    }
}

fn sanitize_viewport(viewport: Vec2) -> Vec2 {
    if viewport.is_finite() {
        viewport.max(Vec2::ONE)
    } else {
        Vec2::ONE
    }
}
