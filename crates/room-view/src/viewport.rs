//! 3D perspective view: orbit camera, item picking, gizmo dragging and the
//! per-frame scene description handed to the renderer.

use crate::assets::{AssetRef, AssetResolver};
use crate::cache::LayoutCache;
use crate::camera::OrbitCamera;
use crate::config::{CameraSettings, PlannerConfig};
use crate::drag::{DragController, GizmoGrab};
use crate::gizmo::{hit_handle, GizmoFrame, GizmoHandle, GizmoMode};
use crate::lighting::LightingPreset;
use crate::view::{PointerButton, PointerEvent, SceneView, ViewKind, ViewResponse};
use glam::{Mat4, Vec2, Vec3};
use room_core::{Color, FurnitureKind, ItemId, Scene};
use room_geom::{item_transform, FloorTile, ItemPicker, LightShaft, WallPiece};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ItemInstance {
    pub id: ItemId,
    pub kind: FurnitureKind,
    /// Item position, rotation and scale.
    pub transform: Mat4,
    pub asset: AssetRef,
    pub color: Color,
    pub selected: bool,
}

impl ItemInstance {
    /// Transform for the asset itself, including the model's own scale and
    /// vertical offset.
    pub fn asset_transform(&self) -> Mat4 {
        match self.asset {
            AssetRef::Model(model) => {
                self.transform
                    * Mat4::from_scale(Vec3::splat(model.scale))
                    * Mat4::from_translation(Vec3::new(0.0, model.y_offset, 0.0))
            }
            AssetRef::Primitive(_) => self.transform,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub item: ItemId,
    pub position: Vec3,
    pub intensity: f32,
    pub distance: f32,
    pub color: Color,
}

/// Everything the renderer draws for one 3D frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub lighting: LightingPreset,
    pub floor_color: Color,
    pub wall_color: Color,
    pub floor: Vec<FloorTile>,
    pub walls: Vec<WallPiece>,
    pub glass: Vec<WallPiece>,
    pub frames: Vec<WallPiece>,
    pub light_shafts: Vec<LightShaft>,
    pub items: Vec<ItemInstance>,
    pub lights: Vec<PointLight>,
    pub gizmo: Option<GizmoFrame>,
}

#[derive(Debug, Clone, Copy, Default)]
struct InputState {
    last_pos: Option<Vec2>,
    active_button: Option<PointerButton>,
}

#[derive(Debug)]
pub struct Viewport3d {
    camera: OrbitCamera,
    settings: CameraSettings,
    drag: DragController<GizmoGrab>,
    input: InputState,
    gizmo_mode: GizmoMode,
    editing: bool,
    picker: ItemPicker,
    layout: LayoutCache,
}

impl Viewport3d {
    pub fn new(config: &PlannerConfig) -> Self {
        let settings = config.camera;
        let viewport = Vec2::from_array(config.blueprint.default_viewport);
        Self {
            camera: OrbitCamera::new(settings, viewport),
            settings,
            drag: DragController::new(settings.click_slop),
            input: InputState::default(),
            gizmo_mode: GizmoMode::default(),
            editing: true,
            picker: ItemPicker::new(),
            layout: LayoutCache::new(config.shape, config.walls),
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn drag(&self) -> &DragController<GizmoGrab> {
        &self.drag
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.gizmo_mode
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        self.gizmo_mode = mode;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Tour mode turns editing off: items can still be selected but no
    /// gizmo is attached.
    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    pub fn frame(&mut self, scene: &Scene, assets: &dyn AssetResolver) -> SceneFrame {
        let room = scene.room();
        let gizmo = self.gizmo_target(scene).map(|(id, origin)| {
            let active = self.drag.session().map(|grab| grab.handle);
            GizmoFrame::new(id, self.gizmo_mode, origin, active)
        });
        let view_proj = self.camera.view_proj();
        let eye = self.camera.eye();
        let layout = self.layout.get(scene);

        let mut glass = Vec::new();
        let mut frames = Vec::new();
        let mut light_shafts = Vec::new();
        for wall in &layout.walls {
            for opening in &wall.cut.openings {
                glass.push(WallPiece::from_wall_box(&wall.segment, &opening.glass_bounds));
                frames.extend(
                    opening
                        .frame_bars
                        .iter()
                        .map(|bar| WallPiece::from_wall_box(&wall.segment, &bar.bounds)),
                );
                light_shafts.push(opening.light);
            }
        }

        let selected = scene.selected_id();
        let mut lights = Vec::new();
        let items = scene
            .items()
            .iter()
            .map(|item| {
                let transform = item_transform(item);
                if let Some(light) = item.kind.light() {
                    lights.push(PointLight {
                        item: item.id,
                        position: transform.transform_point3(Vec3::from_array(light.offset)),
                        intensity: light.intensity,
                        distance: light.distance,
                        color: Color::new(light.color),
                    });
                }
                ItemInstance {
                    id: item.id,
                    kind: item.kind.clone(),
                    transform,
                    asset: assets.resolve(&item.kind),
                    color: item.display_color(),
                    selected: selected == Some(item.id),
                }
            })
            .collect();

        SceneFrame {
            view_proj,
            eye,
            lighting: LightingPreset::for_mode(room.lighting_mode),
            floor_color: room.floor_color.clone(),
            wall_color: room.wall_color.clone(),
            floor: layout.geometry.floor_tiles.clone(),
            walls: layout.pieces(),
            glass,
            frames,
            light_shafts,
            items,
            lights,
            gizmo,
        }
    }

    /// Selected item and the gizmo origin, when a gizmo is shown.
    fn gizmo_target(&self, scene: &Scene) -> Option<(ItemId, Vec3)> {
        if !self.editing {
            return None;
        }
        scene
            .selected_item()
            .map(|item| (item.id, Vec3::from_array(item.position)))
    }

    fn press_primary(&mut self, scene: &mut Scene, pos: Vec2) -> ViewResponse {
        let ray = self.camera.ray(pos);

        if let Some((id, origin)) = self.gizmo_target(scene) {
            let handle = hit_handle(
                self.gizmo_mode,
                origin,
                &self.camera,
                pos,
                self.settings.handle_tolerance,
            );
            let grab = handle.and_then(|handle| {
                scene
                    .item(id)
                    .map(|item| GizmoGrab::start(item, handle, ray, pos))
            });
            if let Some(grab) = grab {
                return self.start_drag(scene, grab);
            }
        }

        let Some(hit) = self.picker.pick(scene.items(), ray) else {
            self.drag.press_background(pos);
            return ViewResponse::default();
        };
        if !self.editing {
            let selection_changed = scene.selected_id() != Some(hit.item);
            scene.select(Some(hit.item));
            return ViewResponse {
                selection_changed,
                ..ViewResponse::default()
            };
        }
        let handle = match self.gizmo_mode {
            GizmoMode::Translate => GizmoHandle::PlaneXZ,
            GizmoMode::Rotate => GizmoHandle::RingY,
            GizmoMode::Scale => GizmoHandle::Uniform,
        };
        let Some(grab) = scene
            .item(hit.item)
            .map(|item| GizmoGrab::start(item, handle, ray, pos))
        else {
            return ViewResponse::default();
        };
        self.start_drag(scene, grab)
    }

    fn start_drag(&mut self, scene: &mut Scene, grab: GizmoGrab) -> ViewResponse {
        self.camera.set_enabled(false);
        self.drag.press_item(scene, grab)
    }

    fn pointer_moved(&mut self, scene: &mut Scene, pos: Vec2) -> ViewResponse {
        let last = self.input.last_pos.replace(pos);
        if let Some(grab) = self.drag.session_mut() {
            let ray = self.camera.ray(pos);
            let Some(patch) = grab.drag_to(ray, pos) else {
                return ViewResponse::default();
            };
            let id = grab.item;
            return ViewResponse {
                scene_changed: scene.update(id, patch),
                ..ViewResponse::default()
            };
        }

        let Some(last) = last else {
            return ViewResponse::default();
        };
        let camera_changed = match self.input.active_button {
            Some(PointerButton::Primary) if self.drag.is_pressed_background() => {
                self.camera.orbit_arcball(last, pos)
            }
            Some(PointerButton::Middle | PointerButton::Secondary) => self.camera.pan(pos - last),
            _ => false,
        };
        ViewResponse {
            camera_changed,
            ..ViewResponse::default()
        }
    }

    fn released(&mut self, scene: &mut Scene, pos: Vec2) -> ViewResponse {
        self.input = InputState::default();
        let (grab, response) = self.drag.release(scene, pos);
        let Some(grab) = grab else {
            return response;
        };
        self.camera.set_enabled(true);
        let scene_changed = scene.update(grab.item, grab.commit_patch());
        debug!(item = grab.item, handle = ?grab.handle, "gizmo committed");
        response.merge(ViewResponse {
            scene_changed,
            ..ViewResponse::default()
        })
    }

    fn left(&mut self) -> ViewResponse {
        self.input = InputState::default();
        if self.drag.cancel().is_some() {
            self.camera.set_enabled(true);
        }
        ViewResponse::default()
    }
}

impl SceneView for Viewport3d {
    fn kind(&self) -> ViewKind {
        ViewKind::Perspective
    }

    fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.camera.set_viewport(Vec2::new(width, height));
        }
    }

    fn handle_pointer(&mut self, scene: &mut Scene, event: PointerEvent) -> ViewResponse {
        match event {
            PointerEvent::Down { pos, button } => {
                self.input = InputState {
                    last_pos: Some(pos),
                    active_button: Some(button),
                };
                if button == PointerButton::Primary {
                    self.press_primary(scene, pos)
                } else {
                    ViewResponse::default()
                }
            }
            PointerEvent::Move { pos } => self.pointer_moved(scene, pos),
            PointerEvent::Up { pos } => self.released(scene, pos),
            PointerEvent::Leave => self.left(),
            PointerEvent::Wheel { delta } => ViewResponse {
                camera_changed: self.camera.zoom(delta),
                ..ViewResponse::default()
            },
        }
    }
}
