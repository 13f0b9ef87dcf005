//! Editing session: the scene, both views, the active mode, and the
//! save/load hand-off to a design store.
//!
//! Store calls happen outside the session. `prepare_save` builds the
//! request, the host runs it, and `finish_save` / `apply_loaded` turn the
//! outcome into a notification.

use crate::assets::{capture_thumbnail, AssetResolver, RenderCapture};
use crate::blueprint::{BlueprintFrame, BlueprintView};
use crate::config::PlannerConfig;
use crate::view::{PointerEvent, SceneView, ViewKind, ViewMode, ViewResponse};
use crate::viewport::{SceneFrame, Viewport3d};
use crate::ViewError;
use room_core::{FurnitureKind, ItemId, RoomShape, Scene, Window};
use room_protocol::{DesignRecordId, SaveDesignRequest, StoreError, StoredDesign};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Short message for the host to show; the session never displays
/// anything itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    scene: Scene,
    mode: ViewMode,
    blueprint: BlueprintView,
    viewport: Viewport3d,
}

impl Session {
    pub fn new(config: &PlannerConfig) -> Self {
        Self::with_scene(config, Scene::default())
    }

    pub fn with_scene(config: &PlannerConfig, scene: Scene) -> Self {
        Self {
            scene,
            mode: ViewMode::default(),
            blueprint: BlueprintView::new(config),
            viewport: Viewport3d::new(config),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct access for editing panels (property sliders, color pickers).
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switches the active view. A gesture in progress on the old view is
    /// cancelled first.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        let (view, scene) = self.active_view_mut();
        view.cancel(scene);
        self.mode = mode;
        self.viewport.set_editing(mode.allows_editing());
        info!(%mode, "view mode changed");
    }

    pub fn blueprint(&self) -> &BlueprintView {
        &self.blueprint
    }

    pub fn viewport(&self) -> &Viewport3d {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport3d {
        &mut self.viewport
    }

    pub fn resize(&mut self, kind: ViewKind, width: f32, height: f32) {
        match kind {
            ViewKind::Blueprint => self.blueprint.resize(width, height),
            ViewKind::Perspective => self.viewport.resize(width, height),
        }
    }

    /// Routes pointer input to the view of the current mode.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> ViewResponse {
        let (view, scene) = self.active_view_mut();
        view.handle_pointer(scene, event)
    }

    pub fn blueprint_frame(&mut self) -> Option<BlueprintFrame> {
        self.blueprint.frame(&self.scene)
    }

    pub fn scene_frame(&mut self, assets: &dyn AssetResolver) -> SceneFrame {
        self.viewport.frame(&self.scene, assets)
    }

    pub fn add_item(&mut self, kind: FurnitureKind) -> (ItemId, Notification) {
        let message = format!("{kind} added to canvas");
        let id = self.scene.add(kind);
        (id, Notification::success(message))
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Notification> {
        self.scene
            .remove(id)
            .map(|_| Notification::info("Item removed"))
    }

    /// Changes the room shape; windows left without a wall are dropped and
    /// reported.
    pub fn set_shape(&mut self, shape: RoomShape) -> (Vec<Window>, Option<Notification>) {
        let dropped = self.scene.set_shape(shape);
        let notice = match dropped.len() {
            0 => None,
            1 => Some(Notification::info("1 window removed with its wall")),
            n => Some(Notification::info(format!("{n} windows removed with their walls"))),
        };
        (dropped, notice)
    }

    pub fn prepare_save(
        &self,
        user_id: &str,
        name: &str,
        capture: Option<&mut dyn RenderCapture>,
    ) -> Result<SaveDesignRequest, ViewError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ViewError::EmptyDesignName);
        }
        let thumbnail = capture_thumbnail(capture);
        Ok(SaveDesignRequest::new(
            user_id,
            self.scene.snapshot(name),
            thumbnail,
        ))
    }

    /// Turns a save outcome into a notification. The scene is never touched.
    pub fn finish_save(&self, result: Result<DesignRecordId, StoreError>) -> Notification {
        match result {
            Ok(id) => {
                info!(id, "design saved");
                Notification::success("Project saved successfully")
            }
            Err(err) => {
                warn!(%err, "design save failed");
                Notification::error("Failed to save project")
            }
        }
    }

    /// Applies the most recent loaded design. Items, room and windows are
    /// replaced together; an empty list or a failure leaves the scene as is.
    pub fn apply_loaded(&mut self, result: Result<Vec<StoredDesign>, StoreError>) -> Notification {
        let designs = match result {
            Ok(designs) => designs,
            Err(err) => {
                warn!(%err, "design load failed");
                return Notification::error("Failed to load designs");
            }
        };
        let Some(latest) = designs.into_iter().last() else {
            return Notification::info("No saved designs found");
        };
        let name = latest.design.name.clone();
        let (view, scene) = self.active_view_mut();
        view.cancel(scene);
        self.scene.replace_design(latest.design);
        Notification::success(format!("Loaded: {name}"))
    }

    fn active_view_mut(&mut self) -> (&mut dyn SceneView, &mut Scene) {
        match self.mode.view_kind() {
            ViewKind::Blueprint => (&mut self.blueprint, &mut self.scene),
            ViewKind::Perspective => (&mut self.viewport, &mut self.scene),
        }
    }
}
