//! Top-down 2D blueprint: drawing frame, hit testing, item dragging and SVG
//! export.

use crate::cache::LayoutCache;
use crate::config::{BlueprintSettings, PlannerConfig};
use crate::drag::{BlueprintGrab, DragController};
use crate::view::{PointerButton, PointerEvent, SceneView, ViewKind, ViewResponse};
use glam::Vec2;
use room_core::{Color, ItemId, ItemPatch, RoomConfig, Scene, WindowId};
use room_geom::CoordinateMapper;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowMark {
    pub window: WindowId,
    pub from: Vec2,
    pub to: Vec2,
    /// Dashed sun rays pointing into the room.
    pub rays: Vec<[Vec2; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionLabel {
    pub text: String,
    pub at: Vec2,
    pub rotation_deg: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintItem {
    pub id: ItemId,
    pub label: String,
    pub center: Vec2,
    /// Footprint in pixels, before rotation.
    pub size: Vec2,
    /// Clockwise on screen.
    pub rotation_deg: f32,
    pub color: Color,
    pub selected: bool,
}

impl BlueprintItem {
    /// Point test in surface pixels, honoring the item rotation.
    pub fn contains(&self, point: Vec2) -> bool {
        let local = Vec2::from_angle(-self.rotation_deg.to_radians()).rotate(point - self.center);
        local.x.abs() <= self.size.x / 2.0 && local.y.abs() <= self.size.y / 2.0
    }
}

/// Everything needed to draw one blueprint, in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct BlueprintFrame {
    pub size: Vec2,
    pub scale: f32,
    pub outline: Vec<Vec2>,
    pub floor_color: Color,
    pub wall_color: Color,
    pub grid: Vec<[Vec2; 2]>,
    pub walls: Vec<[Vec2; 2]>,
    pub windows: Vec<WindowMark>,
    pub dimensions: Vec<DimensionLabel>,
    pub items: Vec<BlueprintItem>,
}

impl BlueprintFrame {
    /// Topmost item under `point`; later items draw on top.
    pub fn item_at(&self, point: Vec2) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|item| item.contains(point))
            .map(|item| item.id)
    }

    /// Standalone SVG document of the frame.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BlueprintFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.size.x,
            h = self.size.y
        )?;
        writeln!(
            f,
            r##"<rect width="100%" height="100%" fill="#0d1117"/>"##
        )?;
        for [a, b] in &self.grid {
            writeln!(
                f,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="rgba(255,255,255,0.06)" stroke-width="1"/>"#,
                a.x, a.y, b.x, b.y
            )?;
        }
        let points = points_attr(&self.outline);
        writeln!(
            f,
            r#"<polygon points="{points}" fill="{}" fill-opacity="0.25" stroke="none"/>"#,
            self.floor_color
        )?;
        for [a, b] in &self.walls {
            writeln!(
                f,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="3" stroke-linecap="round"/>"#,
                a.x, a.y, b.x, b.y, self.wall_color
            )?;
        }
        for mark in &self.windows {
            writeln!(
                f,
                r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#60a5fa" stroke-width="6" stroke-linecap="round"/>"##,
                mark.from.x, mark.from.y, mark.to.x, mark.to.y
            )?;
            for [a, b] in &mark.rays {
                writeln!(
                    f,
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="rgba(255,245,160,0.35)" stroke-width="1.5" stroke-dasharray="3 3"/>"#,
                    a.x, a.y, b.x, b.y
                )?;
            }
        }
        for label in &self.dimensions {
            writeln!(
                f,
                r##"<text x="{x:.2}" y="{y:.2}" fill="#888" font-size="11" font-family="monospace" text-anchor="middle" transform="rotate({r}, {x:.2}, {y:.2})">{t}</text>"##,
                x = label.at.x,
                y = label.at.y,
                r = label.rotation_deg,
                t = escape(&label.text)
            )?;
        }
        for item in &self.items {
            let corner = item.center - item.size / 2.0;
            let stroke = if item.selected { "#fff" } else { "rgba(255,255,255,0.3)" };
            let opacity = if item.selected { 0.85 } else { 0.65 };
            writeln!(
                f,
                r#"<g transform="rotate({r}, {cx:.2}, {cy:.2})"><rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" rx="3" fill="{fill}" fill-opacity="{opacity}" stroke="{stroke}"/><text x="{cx:.2}" y="{ty:.2}" fill="white" font-size="10" text-anchor="middle">{label}</text></g>"#,
                r = item.rotation_deg,
                cx = item.center.x,
                cy = item.center.y,
                x = corner.x,
                y = corner.y,
                w = item.size.x,
                h = item.size.y,
                fill = item.color,
                ty = item.center.y + 4.0,
                label = escape(&item.label)
            )?;
        }
        writeln!(f, "</svg>")
    }
}

fn points_attr(points: &[Vec2]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Debug, Clone)]
pub struct BlueprintView {
    settings: BlueprintSettings,
    viewport: Vec2,
    mapper: Option<CoordinateMapper>,
    drag: DragController<BlueprintGrab>,
    layout: LayoutCache,
}

impl BlueprintView {
    pub fn new(config: &PlannerConfig) -> Self {
        let settings = config.blueprint;
        Self {
            settings,
            viewport: Vec2::from_array(settings.default_viewport),
            mapper: None,
            drag: DragController::new(settings.click_slop),
            layout: LayoutCache::new(config.shape, config.walls),
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn drag(&self) -> &DragController<BlueprintGrab> {
        &self.drag
    }

    /// Current mapping for `room`. An unusable viewport keeps the last
    /// good mapping.
    pub fn mapper(&mut self, room: &RoomConfig) -> Option<CoordinateMapper> {
        if let Some(mapper) =
            CoordinateMapper::fit(self.viewport, room.width, room.depth, self.settings.padding)
        {
            self.mapper = Some(mapper);
        }
        self.mapper
    }

    pub fn frame(&mut self, scene: &Scene) -> Option<BlueprintFrame> {
        let mapper = self.mapper(scene.room())?;
        let room = scene.room();
        let layout = self.layout.get(scene);
        let project = |p: Vec2| mapper.world_to_projection(p);
        let (min, max) = layout.geometry.extent();

        let grid = grid_lines(min, max, self.settings.grid_step)
            .into_iter()
            .map(|[a, b]| [project(a), project(b)])
            .collect();

        let walls = layout
            .walls
            .iter()
            .map(|wall| [project(wall.segment.from), project(wall.segment.to)])
            .collect();

        let mut windows = Vec::new();
        for wall in &layout.walls {
            let normal = wall.segment.inward_normal();
            for opening in &wall.cut.openings {
                let from = wall.segment.point_along(opening.center - opening.half_width);
                let to = wall.segment.point_along(opening.center + opening.half_width);
                let (from, to) = (project(from), project(to));
                let count = self.settings.sun_ray_count;
                let rays = (1..=count)
                    .map(|i| {
                        let t = i as f32 / (count + 1) as f32;
                        let start = from.lerp(to, t);
                        [start, start + normal * self.settings.sun_ray_length]
                    })
                    .collect();
                windows.push(WindowMark {
                    window: opening.window,
                    from,
                    to,
                    rays,
                });
            }
        }

        let dimensions = vec![
            DimensionLabel {
                text: format!("{}m", room.width),
                at: Vec2::new(mapper.origin().x, project(Vec2::new(0.0, max.y)).y + 24.0),
                rotation_deg: 0.0,
            },
            DimensionLabel {
                text: format!("{}m", room.depth),
                at: Vec2::new(project(Vec2::new(min.x, 0.0)).x - 20.0, mapper.origin().y),
                rotation_deg: -90.0,
            },
        ];

        let selected = scene.selected_id();
        let items = scene
            .items()
            .iter()
            .map(|item| {
                let (w, d) = item.kind.footprint();
                let footprint = Vec2::new(w * item.scale[0].abs(), d * item.scale[2].abs());
                BlueprintItem {
                    id: item.id,
                    label: item.kind.tag().to_string(),
                    center: project(Vec2::new(item.position[0], item.position[2])),
                    size: footprint * mapper.scale(),
                    rotation_deg: -item.yaw().to_degrees(),
                    color: item.display_color(),
                    selected: selected == Some(item.id),
                }
            })
            .collect();

        Some(BlueprintFrame {
            size: mapper.viewport(),
            scale: mapper.scale(),
            outline: layout.geometry.outline.iter().map(|p| project(*p)).collect(),
            floor_color: room.floor_color.clone(),
            wall_color: room.wall_color.clone(),
            grid,
            walls,
            windows,
            dimensions,
            items,
        })
    }

    fn press(&mut self, scene: &mut Scene, pos: Vec2) -> ViewResponse {
        let Some(frame) = self.frame(scene) else {
            return ViewResponse::default();
        };
        let Some(mapper) = self.mapper else {
            return ViewResponse::default();
        };
        let grab = frame
            .item_at(pos)
            .and_then(|id| scene.item(id))
            .map(|item| BlueprintGrab::start(&mapper, item, pos));
        match grab {
            Some(grab) => self.drag.press_item(scene, grab),
            None => {
                self.drag.press_background(pos);
                ViewResponse::default()
            }
        }
    }

    fn drag_to(&mut self, scene: &mut Scene, pos: Vec2) -> ViewResponse {
        let Some(grab) = self.drag.session().copied() else {
            return ViewResponse::default();
        };
        let Some(height) = scene.item(grab.item).map(|item| item.position[1]) else {
            debug!(item = grab.item, "dragged item vanished");
            self.drag.cancel();
            return ViewResponse::default();
        };
        let Some(mapper) = self.mapper(scene.room()) else {
            return ViewResponse::default();
        };
        let position = grab.target(&mapper, pos, height);
        ViewResponse {
            scene_changed: scene.update(grab.item, ItemPatch::position(position)),
            ..ViewResponse::default()
        }
    }
}

impl SceneView for BlueprintView {
    fn kind(&self) -> ViewKind {
        ViewKind::Blueprint
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    fn handle_pointer(&mut self, scene: &mut Scene, event: PointerEvent) -> ViewResponse {
        match event {
            PointerEvent::Down {
                pos,
                button: PointerButton::Primary,
            } => self.press(scene, pos),
            PointerEvent::Down { .. } | PointerEvent::Wheel { .. } => ViewResponse::default(),
            PointerEvent::Move { pos } => self.drag_to(scene, pos),
            PointerEvent::Up { pos } => self.drag.release(scene, pos).1,
            PointerEvent::Leave => {
                self.drag.cancel();
                ViewResponse::default()
            }
        }
    }
}

/// Finest grid spacing drawn, in meters.
const MIN_GRID_STEP: f32 = 0.05;
/// Most grid lines drawn across one axis.
const MAX_GRID_LINES_PER_AXIS: f32 = 511.0;

/// 1 m grid lines (or `step`) across the room extent, through the origin.
/// The step doubles until each axis fits in [`MAX_GRID_LINES_PER_AXIS`].
fn grid_lines(min: Vec2, max: Vec2, step: f32) -> Vec<[Vec2; 2]> {
    let half = (max - min) / 2.0;
    let center = (max + min) / 2.0;
    if !half.is_finite() || !center.is_finite() || half.min_element() < 0.0 {
        return Vec::new();
    }
    let mut step = if step.is_finite() { step.max(MIN_GRID_STEP) } else { 1.0 };
    while 2.0 * (half.max_element() / step).floor() + 1.0 > MAX_GRID_LINES_PER_AXIS {
        step *= 2.0;
    }

    let mut lines = Vec::new();
    let nx = (half.x / step).floor() as i32;
    for i in -nx..=nx {
        let x = center.x + i as f32 * step;
        lines.push([Vec2::new(x, min.y), Vec2::new(x, max.y)]);
    }
    let nz = (half.y / step).floor() as i32;
    for i in -nz..=nz {
        let z = center.y + i as f32 * step;
        lines.push([Vec2::new(min.x, z), Vec2::new(max.x, z)]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::{wall, FurnitureKind, RoomShape};

    fn view_with(width: f32, height: f32) -> BlueprintView {
        let mut view = BlueprintView::new(&PlannerConfig::default());
        view.resize(width, height);
        view
    }

    #[test]
    fn rotated_item_hit_test() {
        let item = BlueprintItem {
            id: 1,
            label: "Bed".to_string(),
            center: Vec2::new(100.0, 100.0),
            size: Vec2::new(40.0, 10.0),
            rotation_deg: 90.0,
            color: Color::new("#fff"),
            selected: false,
        };
        assert!(item.contains(Vec2::new(100.0, 118.0)));
        assert!(!item.contains(Vec2::new(118.0, 100.0)));
    }

    #[test]
    fn grid_covers_room_in_meter_steps() {
        let lines = grid_lines(Vec2::new(-5.0, -4.0), Vec2::new(5.0, 4.0), 1.0);
        assert_eq!(lines.len(), 11 + 9);
    }

    #[test]
    fn grid_stays_bounded_for_huge_rooms_and_tiny_steps() {
        let per_axis = MAX_GRID_LINES_PER_AXIS as usize;
        let huge = grid_lines(Vec2::splat(-5.0e6), Vec2::splat(5.0e6), 1.0);
        assert!(!huge.is_empty());
        assert!(huge.len() <= 2 * per_axis);

        let fine = grid_lines(Vec2::splat(-7.5), Vec2::splat(7.5), 1.0e-6);
        assert!(fine.len() <= 2 * per_axis);
        // 0.05 m is the finest spacing, about 300 cells across 15 m
        assert!((2 * 299..=2 * 301).contains(&fine.len()));

        assert!(grid_lines(Vec2::splat(f32::NEG_INFINITY), Vec2::ZERO, 1.0).is_empty());
    }

    #[test]
    fn huge_room_frame_has_bounded_grid() {
        let mut scene = Scene::default();
        scene.set_dimensions(1.0e7, 1.0e7);
        let mut view = view_with(800.0, 600.0);
        let frame = view.frame(&scene).unwrap();
        assert!(frame.grid.len() <= 2 * MAX_GRID_LINES_PER_AXIS as usize);
    }

    #[test]
    fn window_marks_carry_four_inward_rays() {
        let mut scene = Scene::default();
        scene.set_dimensions(10.0, 10.0);
        scene.add_window(wall::BACK).unwrap();
        let mut view = view_with(1000.0, 1000.0);
        let frame = view.frame(&scene).unwrap();
        let mark = &frame.windows[0];
        assert_eq!(mark.rays.len(), 4);
        for [start, end] in &mark.rays {
            // back wall runs left to right, so inward is down the screen
            assert!((end.y - start.y - 20.0).abs() < 1.0e-3);
            assert!((end.x - start.x).abs() < 1.0e-3);
        }
        assert!((mark.from.distance(mark.to) - 1.2 * frame.scale).abs() < 1.0e-2);
    }

    #[test]
    fn degenerate_resize_keeps_previous_mapping() {
        let scene = Scene::default();
        let mut view = view_with(800.0, 600.0);
        let before = view.frame(&scene).unwrap();
        view.resize(0.0, 0.0);
        let after = view.frame(&scene).unwrap();
        assert_eq!(before.scale, after.scale);
    }

    #[test]
    fn never_mapped_view_has_no_frame() {
        let scene = Scene::default();
        let mut view = view_with(0.0, 0.0);
        assert!(view.frame(&scene).is_none());
    }

    #[test]
    fn svg_lists_items_and_outline() {
        let mut scene = Scene::default();
        scene.set_shape(RoomShape::UShape);
        scene.add(FurnitureKind::Other("Piano & Stool".to_string()));
        let mut view = view_with(800.0, 600.0);
        let svg = view.frame(&scene).unwrap().to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("Piano &amp; Stool"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn dimension_labels_show_meters() {
        let scene = Scene::default();
        let mut view = view_with(800.0, 600.0);
        let frame = view.frame(&scene).unwrap();
        let texts: Vec<_> = frame.dimensions.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, ["15m", "15m"]);
    }
}
