//! Room shell configuration: shape, dimensions, materials, windows.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type WindowId = u64;

/// Dimension bounds the editing UI enforces. The geometry layer only
/// requires positive values and clamps anything else.
pub const ROOM_DIMENSION_RANGE: std::ops::RangeInclusive<f32> = 3.0..=50.0;

/// Opaque color value, kept exactly as the user entered it (`#rrggbb` in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Parametric outline of the room. Unknown tags fall back to `Rectangle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomShape {
    #[default]
    Rectangle,
    Square,
    LShape,
    TShape,
    UShape,
    Open,
}

impl RoomShape {
    pub const ALL: [RoomShape; 6] = [
        RoomShape::Rectangle,
        RoomShape::Square,
        RoomShape::LShape,
        RoomShape::TShape,
        RoomShape::UShape,
        RoomShape::Open,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            RoomShape::Rectangle => "rectangle",
            RoomShape::Square => "square",
            RoomShape::LShape => "l-shape",
            RoomShape::TShape => "t-shape",
            RoomShape::UShape => "u-shape",
            RoomShape::Open => "open",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "square" => RoomShape::Square,
            "l-shape" => RoomShape::LShape,
            "t-shape" => RoomShape::TShape,
            "u-shape" => RoomShape::UShape,
            "open" => RoomShape::Open,
            _ => RoomShape::Rectangle,
        }
    }

    /// Wall ids in outline order. Windows reference these, so they must not
    /// depend on the room dimensions.
    pub fn wall_ids(self) -> &'static [&'static str] {
        match self {
            RoomShape::Rectangle | RoomShape::Square => &[wall::BACK, wall::LEFT, wall::RIGHT],
            RoomShape::LShape => &[
                wall::BACK,
                wall::RIGHT,
                wall::L_INNER_H,
                wall::L_INNER_V,
                wall::LEFT,
            ],
            RoomShape::TShape => &[
                wall::BACK,
                wall::RIGHT,
                wall::T_STEP_R,
                wall::T_STEM_R,
                wall::T_STEM_L,
                wall::T_STEP_L,
                wall::LEFT,
            ],
            RoomShape::UShape => &[
                wall::U_ARM_L_BACK,
                wall::U_INNER_L,
                wall::U_INNER_B,
                wall::U_INNER_R,
                wall::U_ARM_R_BACK,
                wall::RIGHT,
                wall::LEFT,
            ],
            RoomShape::Open => &[],
        }
    }

    pub fn has_wall(self, id: &str) -> bool {
        self.wall_ids().contains(&id)
    }
}

impl From<String> for RoomShape {
    fn from(value: String) -> Self {
        Self::from_tag(&value)
    }
}

impl From<RoomShape> for String {
    fn from(value: RoomShape) -> Self {
        value.tag().to_string()
    }
}

impl fmt::Display for RoomShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Stable wall identifiers.
pub mod wall {
    pub const BACK: &str = "back";
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const L_INNER_H: &str = "l-inner-h";
    pub const L_INNER_V: &str = "l-inner-v";
    pub const T_STEP_R: &str = "t-step-r";
    pub const T_STEM_R: &str = "t-stem-r";
    pub const T_STEM_L: &str = "t-stem-l";
    pub const T_STEP_L: &str = "t-step-l";
    pub const U_ARM_L_BACK: &str = "u-arm-l-back";
    pub const U_INNER_L: &str = "u-inner-l";
    pub const U_INNER_B: &str = "u-inner-b";
    pub const U_INNER_R: &str = "u-inner-r";
    pub const U_ARM_R_BACK: &str = "u-arm-r-back";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LightingMode {
    #[default]
    Day,
    Golden,
    Night,
}

impl LightingMode {
    pub fn tag(self) -> &'static str {
        match self {
            LightingMode::Day => "Day",
            LightingMode::Golden => "Golden",
            LightingMode::Night => "Night",
        }
    }
}

impl From<String> for LightingMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Golden" => LightingMode::Golden,
            "Night" => LightingMode::Night,
            _ => LightingMode::Day,
        }
    }
}

impl From<LightingMode> for String {
    fn from(value: LightingMode) -> Self {
        value.tag().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    #[serde(default)]
    pub shape: RoomShape,
    #[serde(default = "default_extent")]
    pub width: f32,
    #[serde(default = "default_extent")]
    pub depth: f32,
    #[serde(default = "default_wall_color")]
    pub wall_color: Color,
    #[serde(default = "default_floor_color")]
    pub floor_color: Color,
    #[serde(default)]
    pub lighting_mode: LightingMode,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            shape: RoomShape::Rectangle,
            width: default_extent(),
            depth: default_extent(),
            wall_color: default_wall_color(),
            floor_color: default_floor_color(),
            lighting_mode: LightingMode::Day,
        }
    }
}

fn default_extent() -> f32 {
    15.0
}

fn default_wall_color() -> Color {
    Color::new("#e0e0e0")
}

fn default_floor_color() -> Color {
    Color::new("#5c3a21")
}

/// Window opening on a named wall. `position` is the fraction of the wall's
/// directed length at which the opening is centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub id: WindowId,
    pub wall: String,
    pub position: f32,
    pub width: f32,
    pub height: f32,
    pub sill_height: f32,
}

impl Window {
    pub const DEFAULT_POSITION: f32 = 0.5;
    pub const DEFAULT_WIDTH: f32 = 1.2;
    pub const DEFAULT_HEIGHT: f32 = 1.4;
    pub const DEFAULT_SILL: f32 = 0.9;

    pub fn new(id: WindowId, wall: impl Into<String>) -> Self {
        Self {
            id,
            wall: wall.into(),
            position: Self::DEFAULT_POSITION,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            sill_height: Self::DEFAULT_SILL,
        }
    }

    /// Smallest opening width or height a patch can set, in meters.
    pub const MIN_SIZE: f32 = 0.1;

    /// Non-finite values in the patch are ignored.
    fn apply(&mut self, patch: &WindowPatch) {
        if let Some(wall) = &patch.wall {
            self.wall = wall.clone();
        }
        if let Some(position) = patch.position.filter(|v| v.is_finite()) {
            self.position = position.clamp(0.0, 1.0);
        }
        if let Some(width) = patch.width.filter(|v| v.is_finite()) {
            self.width = width.max(Self::MIN_SIZE);
        }
        if let Some(height) = patch.height.filter(|v| v.is_finite()) {
            self.height = height.max(Self::MIN_SIZE);
        }
        if let Some(sill) = patch.sill_height.filter(|v| v.is_finite()) {
            self.sill_height = sill.max(0.0);
        }
    }
}

/// Property edit for a window; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowPatch {
    pub wall: Option<String>,
    pub position: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub sill_height: Option<f32>,
}

impl WindowPatch {
    pub(crate) fn apply_to(&self, window: &mut Window) {
        window.apply(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_shape_tag_falls_back_to_rectangle() {
        let shape: RoomShape = serde_json::from_str("\"hexagon\"").unwrap();
        assert_eq!(shape, RoomShape::Rectangle);
    }

    #[test]
    fn room_config_uses_camel_case_and_defaults() {
        let json = r##"{"width":10,"depth":8,"wallColor":"#fff","floorColor":"#000","lightingMode":"Night"}"##;
        let room: RoomConfig = serde_json::from_str(json).unwrap();
        assert_eq!(room.shape, RoomShape::Rectangle);
        assert_eq!(room.lighting_mode, LightingMode::Night);
        assert_eq!(room.wall_color.as_str(), "#fff");

        let back = serde_json::to_value(&room).unwrap();
        assert_eq!(back["shape"], "rectangle");
        assert_eq!(back["lightingMode"], "Night");
    }

    #[test]
    fn wall_ids_are_unique_per_shape() {
        for shape in RoomShape::ALL {
            let ids = shape.wall_ids();
            for (i, id) in ids.iter().enumerate() {
                assert!(!ids[i + 1..].contains(id), "{shape}: duplicate wall id {id}");
            }
        }
    }

    #[test]
    fn window_patch_clamps_position() {
        let mut window = Window::new(1, wall::BACK);
        WindowPatch {
            position: Some(1.7),
            sill_height: Some(-2.0),
            ..Default::default()
        }
        .apply_to(&mut window);
        assert_eq!(window.position, 1.0);
        assert_eq!(window.sill_height, 0.0);
        assert_eq!(window.width, Window::DEFAULT_WIDTH);
    }

    #[test]
    fn window_patch_keeps_size_positive_and_finite() {
        let mut window = Window::new(1, wall::BACK);
        WindowPatch {
            width: Some(-1.0),
            height: Some(0.0),
            ..Default::default()
        }
        .apply_to(&mut window);
        assert_eq!(window.width, Window::MIN_SIZE);
        assert_eq!(window.height, Window::MIN_SIZE);

        WindowPatch {
            position: Some(f32::NAN),
            width: Some(f32::INFINITY),
            height: Some(f32::NAN),
            sill_height: Some(f32::NEG_INFINITY),
            ..Default::default()
        }
        .apply_to(&mut window);
        assert_eq!(window.position, Window::DEFAULT_POSITION);
        assert_eq!(window.width, Window::MIN_SIZE);
        assert_eq!(window.height, Window::MIN_SIZE);
        assert_eq!(window.sill_height, Window::DEFAULT_SILL);
    }
}
