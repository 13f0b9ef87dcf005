//! Pointer gesture state machine shared by both views.
//!
//! A gesture starts on pointer-down either on an item (`Dragging`) or on
//! empty background (`PressedBackground`). Only a background gesture can
//! clear the selection, and only when it ends; an item press moves the
//! machine out of `PressedBackground`, so a clear can never follow a drag
//! start within one gesture.

use crate::gizmo::GizmoHandle;
use crate::view::ViewResponse;
use glam::{Vec2, Vec3};
use room_core::{FurnitureItem, ItemId, ItemPatch, Scene};
use room_geom::{CoordinateMapper, Ray};
use std::f32::consts::{PI, TAU};
use tracing::debug;

/// Scale change per pixel of vertical pointer travel on the scale handle.
const SCALE_PER_PIXEL: f32 = 0.005;
const MIN_SCALE_FACTOR: f32 = 0.05;

pub trait Grab {
    fn item(&self) -> ItemId;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState<S> {
    Idle,
    /// Pressed on empty background at `at`.
    PressedBackground { at: Vec2 },
    Dragging(S),
}

#[derive(Debug, Clone)]
pub struct DragController<S> {
    state: DragState<S>,
    click_slop: f32,
}

impl<S: Grab> DragController<S> {
    pub fn new(click_slop: f32) -> Self {
        Self {
            state: DragState::Idle,
            click_slop: click_slop.max(0.0),
        }
    }

    pub fn state(&self) -> &DragState<S> {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn is_pressed_background(&self) -> bool {
        matches!(self.state, DragState::PressedBackground { .. })
    }

    pub fn session(&self) -> Option<&S> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut S> {
        match &mut self.state {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Pointer-down on an item: selects it and starts dragging.
    pub fn press_item(&mut self, scene: &mut Scene, session: S) -> ViewResponse {
        let id = session.item();
        let selection_changed = scene.selected_id() != Some(id);
        scene.select(Some(id));
        debug!(item = id, "drag started");
        self.state = DragState::Dragging(session);
        ViewResponse {
            selection_changed,
            ..ViewResponse::default()
        }
    }

    pub fn press_background(&mut self, at: Vec2) {
        self.state = DragState::PressedBackground { at };
    }

    /// Pointer-up. Ends the gesture and hands back the drag session, if
    /// any. A background press released within the click slop clears the
    /// selection.
    pub fn release(&mut self, scene: &mut Scene, at: Vec2) -> (Option<S>, ViewResponse) {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) => {
                debug!(item = session.item(), "drag finished");
                (Some(session), ViewResponse::default())
            }
            DragState::PressedBackground { at: start } => {
                let is_click = start.distance(at) <= self.click_slop;
                let selection_changed = is_click && scene.selected_id().is_some();
                if selection_changed {
                    scene.select(None);
                }
                (
                    None,
                    ViewResponse {
                        selection_changed,
                        ..ViewResponse::default()
                    },
                )
            }
            DragState::Idle => (None, ViewResponse::default()),
        }
    }

    /// Pointer left the surface. Applied updates stay, the selection is
    /// untouched.
    pub fn cancel(&mut self) -> Option<S> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging(session) => Some(session),
            _ => None,
        }
    }
}

/// 2D drag: the item follows the pointer, keeping the offset between the
/// pointer and the item center captured at press time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlueprintGrab {
    pub item: ItemId,
    pub offset: Vec2,
}

impl BlueprintGrab {
    pub fn start(mapper: &CoordinateMapper, item: &FurnitureItem, pointer: Vec2) -> Self {
        let center = mapper.world_to_projection(Vec2::new(item.position[0], item.position[2]));
        Self {
            item: item.id,
            offset: pointer - center,
        }
    }

    /// New item position for a pointer position; `height` is kept as is.
    pub fn target(&self, mapper: &CoordinateMapper, pointer: Vec2, height: f32) -> [f32; 3] {
        let world = mapper.projection_to_world(pointer - self.offset);
        [world.x, height, world.y]
    }
}

impl Grab for BlueprintGrab {
    fn item(&self) -> ItemId {
        self.item
    }
}

/// Item transform as the gizmo edits it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPose {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl ItemPose {
    pub fn of(item: &FurnitureItem) -> Self {
        Self {
            position: item.position,
            rotation: item.rotation,
            scale: item.scale,
        }
    }

    /// One update carrying position, rotation and scale together.
    pub fn commit_patch(&self) -> ItemPatch {
        ItemPatch {
            position: Some(self.position),
            rotation: Some(self.rotation),
            scale: Some(self.scale),
            color: None,
        }
    }
}

/// 3D drag on a gizmo handle. Translation and rotation follow the
/// pointer ray on the horizontal plane through the item origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoGrab {
    pub item: ItemId,
    pub handle: GizmoHandle,
    start: ItemPose,
    current: ItemPose,
    start_hit: Option<Vec3>,
    start_pointer: Vec2,
}

impl GizmoGrab {
    pub fn start(item: &FurnitureItem, handle: GizmoHandle, ray: Ray, pointer: Vec2) -> Self {
        let pose = ItemPose::of(item);
        Self {
            item: item.id,
            handle,
            start: pose,
            current: pose,
            start_hit: ray.hit_horizontal_plane(pose.position[1]),
            start_pointer: pointer,
        }
    }

    pub fn pose(&self) -> ItemPose {
        self.current
    }

    pub fn commit_patch(&self) -> ItemPatch {
        self.current.commit_patch()
    }

    /// Follows the pointer. Returns the patch for the part of the pose this
    /// handle edits, or `None` when the ray misses the drag plane.
    pub fn drag_to(&mut self, ray: Ray, pointer: Vec2) -> Option<ItemPatch> {
        match self.handle {
            GizmoHandle::AxisX | GizmoHandle::AxisZ | GizmoHandle::PlaneXZ => {
                let (start_hit, hit) = self.plane_hits(ray)?;
                let delta = hit - start_hit;
                let delta = match self.handle {
                    GizmoHandle::AxisX => Vec3::new(delta.x, 0.0, 0.0),
                    GizmoHandle::AxisZ => Vec3::new(0.0, 0.0, delta.z),
                    _ => Vec3::new(delta.x, 0.0, delta.z),
                };
                let position = (Vec3::from_array(self.start.position) + delta).to_array();
                self.current.position = position;
                Some(ItemPatch::position(position))
            }
            GizmoHandle::RingY => {
                let (start_hit, hit) = self.plane_hits(ray)?;
                let origin = Vec3::from_array(self.start.position);
                let from = start_hit - origin;
                let to = hit - origin;
                if from.length_squared() < 1.0e-6 || to.length_squared() < 1.0e-6 {
                    return None;
                }
                let turn = wrap_angle(to.x.atan2(to.z) - from.x.atan2(from.z));
                let [rx, ry, rz] = self.start.rotation;
                let rotation = [rx, wrap_angle(ry + turn), rz];
                self.current.rotation = rotation;
                Some(ItemPatch {
                    rotation: Some(rotation),
                    ..ItemPatch::default()
                })
            }
            GizmoHandle::Uniform => {
                let travel = self.start_pointer.y - pointer.y;
                let factor = (1.0 + travel * SCALE_PER_PIXEL).max(MIN_SCALE_FACTOR);
                let scale = (Vec3::from_array(self.start.scale) * factor).to_array();
                self.current.scale = scale;
                Some(ItemPatch {
                    scale: Some(scale),
                    ..ItemPatch::default()
                })
            }
        }
    }

    fn plane_hits(&mut self, ray: Ray) -> Option<(Vec3, Vec3)> {
        let hit = ray.hit_horizontal_plane(self.start.position[1])?;
        // A press above the horizon anchors on the first usable hit.
        let start_hit = *self.start_hit.get_or_insert(hit);
        Some((start_hit, hit))
    }
}

impl Grab for GizmoGrab {
    fn item(&self) -> ItemId {
        self.item
    }
}

fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use room_core::FurnitureKind;
    use std::f32::consts::FRAC_PI_2;

    fn down_at(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10.0, z), Vec3::NEG_Y)
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Probe(ItemId);

    impl Grab for Probe {
        fn item(&self) -> ItemId {
            self.0
        }
    }

    #[test]
    fn background_click_clears_selection() {
        let mut scene = Scene::default();
        let id = scene.add(FurnitureKind::Chair);
        let mut drag = DragController::<Probe>::new(4.0);
        drag.press_background(Vec2::new(10.0, 10.0));
        let (_, response) = drag.release(&mut scene, Vec2::new(11.0, 10.0));
        assert!(response.selection_changed);
        assert_eq!(scene.selected_id(), None);
        assert!(scene.item(id).is_some());
    }

    #[test]
    fn background_drag_keeps_selection() {
        let mut scene = Scene::default();
        let id = scene.add(FurnitureKind::Chair);
        let mut drag = DragController::<Probe>::new(4.0);
        drag.press_background(Vec2::ZERO);
        drag.release(&mut scene, Vec2::new(50.0, 0.0));
        assert_eq!(scene.selected_id(), Some(id));
    }

    #[test]
    fn item_press_after_background_press_never_clears() {
        let mut scene = Scene::default();
        let a = scene.add(FurnitureKind::Chair);
        let b = scene.add(FurnitureKind::Bed);
        let mut drag = DragController::new(4.0);
        drag.press_background(Vec2::ZERO);
        drag.press_item(&mut scene, Probe(a));
        let (session, _) = drag.release(&mut scene, Vec2::ZERO);
        assert_eq!(session, Some(Probe(a)));
        assert_eq!(scene.selected_id(), Some(a));
        assert_ne!(a, b);
    }

    #[test]
    fn cancel_keeps_selection() {
        let mut scene = Scene::default();
        let id = scene.add(FurnitureKind::Chair);
        let mut drag = DragController::new(4.0);
        drag.press_item(&mut scene, Probe(id));
        assert_eq!(drag.cancel(), Some(Probe(id)));
        assert!(!drag.is_dragging());
        assert_eq!(scene.selected_id(), Some(id));
    }

    #[test]
    fn blueprint_grab_keeps_pointer_offset() {
        let mapper = CoordinateMapper::fit(Vec2::new(1000.0, 1000.0), 10.0, 10.0, 0.0).unwrap();
        let mut item = FurnitureItem::new(1, FurnitureKind::Table);
        item.position = [1.0, 0.5, 1.0];
        // 100 px per meter; press 20 px right of the center
        let grab = BlueprintGrab::start(&mapper, &item, Vec2::new(620.0, 600.0));
        assert_eq!(grab.offset, Vec2::new(20.0, 0.0));
        let target = grab.target(&mapper, Vec2::new(420.0, 300.0), 0.5);
        assert!((target[0] + 1.0).abs() < 1.0e-5);
        assert!((target[2] + 2.0).abs() < 1.0e-5);
        assert_eq!(target[1], 0.5);
    }

    #[test]
    fn axis_handle_moves_along_one_axis() {
        let item = FurnitureItem::new(1, FurnitureKind::Sofa);
        let mut grab = GizmoGrab::start(&item, GizmoHandle::AxisX, down_at(0.5, 0.0), Vec2::ZERO);
        let patch = grab.drag_to(down_at(2.5, 3.0), Vec2::ZERO).unwrap();
        assert_eq!(patch.position, Some([2.0, 0.5, 0.0]));
        assert_eq!(grab.pose().rotation, item.rotation);
    }

    #[test]
    fn plane_handle_moves_on_the_floor() {
        let item = FurnitureItem::new(1, FurnitureKind::Chair);
        let mut grab = GizmoGrab::start(&item, GizmoHandle::PlaneXZ, down_at(0.0, 0.0), Vec2::ZERO);
        grab.drag_to(down_at(1.0, -2.0), Vec2::ZERO).unwrap();
        assert_eq!(grab.commit_patch().position, Some([1.0, 0.0, -2.0]));
    }

    #[test]
    fn ring_turns_about_vertical_axis() {
        let item = FurnitureItem::new(1, FurnitureKind::Bed);
        let mut grab = GizmoGrab::start(&item, GizmoHandle::RingY, down_at(0.0, 1.0), Vec2::ZERO);
        let patch = grab.drag_to(down_at(1.0, 0.0), Vec2::ZERO).unwrap();
        let rotation = patch.rotation.unwrap();
        assert!((rotation[1] - FRAC_PI_2).abs() < 1.0e-5);
        assert_eq!(rotation[0], 0.0);
    }

    #[test]
    fn scale_handle_is_uniform_and_bounded() {
        let item = FurnitureItem::new(1, FurnitureKind::Cabinet);
        let ray = down_at(0.0, 0.0);
        let mut grab = GizmoGrab::start(&item, GizmoHandle::Uniform, ray, Vec2::new(0.0, 300.0));
        let patch = grab.drag_to(ray, Vec2::new(0.0, 200.0)).unwrap();
        let scale = patch.scale.unwrap();
        assert!((scale[0] - 1.5).abs() < 1.0e-5);
        assert_eq!(scale[0], scale[1]);
        assert_eq!(scale[1], scale[2]);
        grab.drag_to(ray, Vec2::new(0.0, 5000.0));
        assert!(grab.pose().scale[0] > 0.0);
    }

    #[test]
    fn horizontal_ray_leaves_pose_alone() {
        let item = FurnitureItem::new(1, FurnitureKind::Chair);
        let mut grab = GizmoGrab::start(&item, GizmoHandle::PlaneXZ, down_at(0.0, 0.0), Vec2::ZERO);
        let flat = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::X);
        assert!(grab.drag_to(flat, Vec2::ZERO).is_none());
        assert_eq!(grab.pose(), ItemPose::of(&item));
    }

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1.0e-5);
        assert!((wrap_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1.0e-6);
    }

    proptest! {
        #[test]
        fn grab_without_motion_keeps_item_in_place(
            x in -20.0f32..20.0,
            z in -20.0f32..20.0,
            px in 0.0f32..800.0,
            py in 0.0f32..600.0,
        ) {
            let mapper = CoordinateMapper::fit(Vec2::new(800.0, 600.0), 40.0, 40.0, 80.0).unwrap();
            let mut item = FurnitureItem::new(1, FurnitureKind::Table);
            item.position = [x, 0.5, z];
            let pointer = Vec2::new(px, py);
            let grab = BlueprintGrab::start(&mapper, &item, pointer);
            let [tx, ty, tz] = grab.target(&mapper, pointer, item.position[1]);
            prop_assert!((tx - x).abs() < 1.0e-3);
            prop_assert_eq!(ty, 0.5);
            prop_assert!((tz - z).abs() < 1.0e-3);
        }
    }
}
