//! Headless operations behind the `room-planner` binary.

use anyhow::{Context, Result};
use room_core::{Design, RoomConfig, RoomShape, Scene, WindowId};
use room_geom::RoomLayout;
use room_view::{BlueprintView, PlannerConfig, SceneView};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallReport {
    pub id: &'static str,
    pub length: f32,
    pub solid_length: f32,
    pub openings: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignReport {
    pub name: String,
    pub shape: RoomShape,
    pub width: f32,
    pub depth: f32,
    pub floor_area: f32,
    pub walls: Vec<WallReport>,
    pub dormant_windows: Vec<WindowId>,
    pub items: usize,
    pub wall_triangles: usize,
}

/// Reads a design JSON file. Stored records and save requests are accepted
/// too, since they carry the same fields.
pub fn load_design(path: &Path) -> Result<Design> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let design: Design = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a design file", path.display()))?;
    debug!(path = %path.display(), items = design.items.len(), "design read");
    Ok(design)
}

pub fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path).context("failed to load planner config"),
        None => Ok(PlannerConfig::default()),
    }
}

pub fn report(design: &Design, config: &PlannerConfig) -> DesignReport {
    let room = &design.room_config;
    let layout = RoomLayout::build(room, &design.windows, &config.shape, &config.walls);
    let walls = layout
        .walls
        .iter()
        .map(|wall| WallReport {
            id: wall.segment.id,
            length: wall.cut.length,
            solid_length: wall.cut.solid_length(),
            openings: wall.cut.openings.len(),
        })
        .collect();
    let wall_triangles = layout
        .wall_mesh()
        .map(|mesh| mesh.triangle_count())
        .unwrap_or(0);
    DesignReport {
        name: design.name.clone(),
        shape: room.shape,
        width: room.width,
        depth: room.depth,
        floor_area: layout.geometry.floor_area(),
        walls,
        dormant_windows: layout.dormant.clone(),
        items: design.items.len(),
        wall_triangles,
    }
}

/// Renders the blueprint of `design` as an SVG document.
pub fn render_blueprint(
    design: Design,
    config: &PlannerConfig,
    width: f32,
    height: f32,
) -> Result<String> {
    let mut scene = Scene::default();
    scene.replace_design(design);
    let mut view = BlueprintView::new(config);
    view.resize(width, height);
    let frame = view
        .frame(&scene)
        .with_context(|| format!("a {width}x{height} surface cannot hold the blueprint"))?;
    Ok(frame.to_svg())
}

/// Empty design for a fresh room.
pub fn starter_design(name: &str, shape: RoomShape, width: f32, depth: f32) -> Design {
    let room = RoomConfig {
        shape,
        width,
        depth,
        ..RoomConfig::default()
    };
    info!(%shape, width, depth, "starter design");
    Scene::new(room).snapshot(name)
}
