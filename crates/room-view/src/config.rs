//! Tunables for the views. Every field has a default so partial JSON files
//! load.

use crate::ViewError;
use room_geom::{ShapeProportions, WallSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintSettings {
    /// Margin kept around the room, in pixels.
    pub padding: f32,
    /// Surface size assumed until the host reports one.
    pub default_viewport: [f32; 2],
    pub grid_step: f32,
    /// Length of the dashed sun rays drawn inside each window.
    pub sun_ray_length: f32,
    pub sun_ray_count: u32,
    /// Pointer travel under which a background press still counts as a click.
    pub click_slop: f32,
}

impl Default for BlueprintSettings {
    fn default() -> Self {
        Self {
            padding: 80.0,
            default_viewport: [800.0, 600.0],
            grid_step: 1.0,
            sun_ray_length: 20.0,
            sun_ray_count: 4,
            click_slop: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// The camera never dips closer than this to the horizon, in radians.
    pub horizon_margin: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub click_slop: f32,
    /// Screen distance within which a gizmo handle is grabbed.
    pub handle_tolerance: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: [10.0, 10.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: 50.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 2.0,
            max_distance: 50.0,
            horizon_margin: 0.05,
            zoom_speed: 0.001,
            pan_speed: 0.0025,
            click_slop: 4.0,
            handle_tolerance: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub shape: ShapeProportions,
    pub walls: WallSettings,
    pub blueprint: BlueprintSettings,
    pub camera: CameraSettings,
}

impl PlannerConfig {
    pub fn from_json(text: &str) -> Result<Self, ViewError> {
        let mut config: Self = serde_json::from_str(text)?;
        config.shape = config.shape.sanitized();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ViewError> {
        let text = std::fs::read_to_string(path).map_err(|source| ViewError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "planner config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = PlannerConfig::from_json("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.blueprint.padding, 80.0);
        assert_eq!(config.camera.max_distance, 50.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config =
            PlannerConfig::from_json(r#"{"walls":{"height":3.0},"camera":{"fov_y_degrees":60}}"#)
                .unwrap();
        assert_eq!(config.walls.height, 3.0);
        assert_eq!(config.walls.thickness, 0.2);
        assert_eq!(config.camera.fov_y_degrees, 60.0);
        assert_eq!(config.camera.min_distance, 2.0);
    }

    #[test]
    fn bad_proportions_are_sanitized() {
        let config = PlannerConfig::from_json(r#"{"shape":{"u_arm_width":-1.0}}"#).unwrap();
        assert!(config.shape.u_arm_width > 0.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            PlannerConfig::from_json("{"),
            Err(ViewError::Config(_))
        ));
    }
}
