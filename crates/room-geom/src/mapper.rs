//! World meters <-> blueprint pixels.

use glam::Vec2;
use serde::Serialize;

/// Uniform fit-to-bounds mapping from the world ground plane (X, Z) onto a
/// pixel surface whose origin is the viewport center. World Z grows
/// downwards on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateMapper {
    viewport: Vec2,
    padding: f32,
    scale: f32,
    origin: Vec2,
}

impl CoordinateMapper {
    /// Fits a `room_width` x `room_depth` room into the viewport with
    /// `padding` pixels on every side. Returns `None` when no usable
    /// mapping exists (zero-sized viewport before layout, padding eating the
    /// whole surface, non-positive room size).
    pub fn fit(viewport: Vec2, room_width: f32, room_depth: f32, padding: f32) -> Option<Self> {
        if !viewport.is_finite() || viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        if !(room_width > 0.0 && room_depth > 0.0) || !room_width.is_finite() || !room_depth.is_finite() {
            return None;
        }
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        let avail = viewport - Vec2::splat(padding * 2.0);
        let scale = (avail.x / room_width).min(avail.y / room_depth);
        if !(scale > 0.0) || !scale.is_finite() {
            return None;
        }
        Some(Self {
            viewport,
            padding,
            scale,
            origin: viewport / 2.0,
        })
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Pixels per meter.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// `world` is `(x, z)` on the ground plane.
    pub fn world_to_projection(&self, world: Vec2) -> Vec2 {
        self.origin + world * self.scale
    }

    /// Exact inverse of [`Self::world_to_projection`]; returns `(x, z)`.
    pub fn projection_to_world(&self, projected: Vec2) -> Vec2 {
        (projected - self.origin) / self.scale
    }

    pub fn length_to_projection(&self, meters: f32) -> f32 {
        meters * self.scale
    }

    pub fn length_to_world(&self, pixels: f32) -> f32 {
        pixels / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fit_uses_tighter_axis() {
        let mapper = CoordinateMapper::fit(Vec2::new(800.0, 600.0), 15.0, 15.0, 80.0).unwrap();
        assert!((mapper.scale() - 440.0 / 15.0).abs() < 1.0e-4);
        assert_eq!(mapper.world_to_projection(Vec2::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn degenerate_viewport_has_no_mapping() {
        assert!(CoordinateMapper::fit(Vec2::ZERO, 10.0, 10.0, 80.0).is_none());
        assert!(CoordinateMapper::fit(Vec2::new(100.0, 100.0), 10.0, 10.0, 80.0).is_none());
        assert!(CoordinateMapper::fit(Vec2::new(800.0, 600.0), 0.0, 10.0, 80.0).is_none());
        assert!(CoordinateMapper::fit(Vec2::new(f32::NAN, 600.0), 10.0, 10.0, 0.0).is_none());
    }

    #[test]
    fn back_wall_maps_above_center() {
        let mapper = CoordinateMapper::fit(Vec2::new(1000.0, 1000.0), 10.0, 10.0, 0.0).unwrap();
        let back = mapper.world_to_projection(Vec2::new(0.0, -5.0));
        assert_eq!(back, Vec2::new(500.0, 0.0));
    }

    proptest! {
        #[test]
        fn projection_round_trips(
            vw in 50.0f32..4000.0,
            vh in 50.0f32..4000.0,
            pad in 0.0f32..20.0,
            rw in 3.0f32..50.0,
            rd in 3.0f32..50.0,
            fx in -0.5f32..=0.5,
            fz in -0.5f32..=0.5,
        ) {
            let mapper = CoordinateMapper::fit(Vec2::new(vw, vh), rw, rd, pad).unwrap();
            let world = Vec2::new(fx * rw, fz * rd);
            let back = mapper.projection_to_world(mapper.world_to_projection(world));
            prop_assert!((back - world).abs().max_element() < 1.0e-3);
        }
    }
}
