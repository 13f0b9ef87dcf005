//! Scene lighting per room lighting mode.

use glam::Vec3;
use room_core::{Color, LightingMode};

/// Fixed shadow-casting key light, independent of the preset.
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 20.0, 10.0);
pub const KEY_LIGHT_INTENSITY: f32 = 1.2;

/// Directional light aimed at the room origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyLight {
    pub position: Vec3,
    pub intensity: f32,
    pub casts_shadows: bool,
}

impl Default for KeyLight {
    fn default() -> Self {
        Self {
            position: KEY_LIGHT_POSITION,
            intensity: KEY_LIGHT_INTENSITY,
            casts_shadows: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    /// Physical sky lit from `sun`.
    Sky,
    Stars,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightingPreset {
    pub ambient: f32,
    pub sun: Vec3,
    pub background: Color,
    pub backdrop: Backdrop,
    pub key_light: KeyLight,
}

impl LightingPreset {
    pub fn for_mode(mode: LightingMode) -> Self {
        match mode {
            LightingMode::Day => Self {
                ambient: 0.6,
                sun: Vec3::new(100.0, 100.0, 50.0),
                background: Color::new("#87CEEB"),
                backdrop: Backdrop::Sky,
                key_light: KeyLight::default(),
            },
            LightingMode::Golden => Self {
                ambient: 0.5,
                sun: Vec3::new(10.0, 5.0, 10.0),
                background: Color::new("#ffcc00"),
                backdrop: Backdrop::Sky,
                key_light: KeyLight::default(),
            },
            LightingMode::Night => Self {
                ambient: 0.1,
                sun: Vec3::new(0.0, -10.0, 0.0),
                background: Color::new("#111111"),
                backdrop: Backdrop::Stars,
                key_light: KeyLight::default(),
            },
        }
    }
}
