//! Shared view surface: pointer events, view modes and the `SceneView` trait.

use glam::Vec2;
use room_core::Scene;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which projection a view draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Blueprint,
    Perspective,
}

/// Mode picked in the toolbar. Tour shows the 3D view without editing
/// handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "3D")]
    ThreeD,
    #[serde(rename = "2D")]
    Blueprint,
    Tour,
}

impl ViewMode {
    pub fn view_kind(self) -> ViewKind {
        match self {
            ViewMode::Blueprint => ViewKind::Blueprint,
            ViewMode::ThreeD | ViewMode::Tour => ViewKind::Perspective,
        }
    }

    pub fn allows_editing(self) -> bool {
        !matches!(self, ViewMode::Tour)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::ThreeD => "3D",
            ViewMode::Blueprint => "2D",
            ViewMode::Tour => "Tour",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Pointer input in surface pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Vec2, button: PointerButton },
    Move { pos: Vec2 },
    Up { pos: Vec2 },
    Leave,
    Wheel { delta: f32 },
}

/// What an event changed, so the host knows what to redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewResponse {
    pub scene_changed: bool,
    pub selection_changed: bool,
    pub camera_changed: bool,
}

impl ViewResponse {
    pub fn needs_redraw(&self) -> bool {
        self.scene_changed || self.selection_changed || self.camera_changed
    }

    pub fn merge(self, other: ViewResponse) -> ViewResponse {
        ViewResponse {
            scene_changed: self.scene_changed || other.scene_changed,
            selection_changed: self.selection_changed || other.selection_changed,
            camera_changed: self.camera_changed || other.camera_changed,
        }
    }
}

/// A projection of the scene that can be resized and driven by pointer
/// input. Views never hold copies of items; frames are derived from the
/// scene on demand.
pub trait SceneView {
    fn kind(&self) -> ViewKind;

    fn resize(&mut self, width: f32, height: f32);

    fn handle_pointer(&mut self, scene: &mut Scene, event: PointerEvent) -> ViewResponse;

    /// Abandons any gesture in progress, as if the pointer left the surface.
    fn cancel(&mut self, scene: &mut Scene) -> ViewResponse {
        self.handle_pointer(scene, PointerEvent::Leave)
    }
}
