//! The editing scene: one authoritative copy of the room, its windows, the
//! placed furniture and the selection. Both views read from here and write
//! back through the same operations.

use crate::furniture::{FurnitureItem, FurnitureKind, ItemId, ItemPatch};
use crate::room::{Color, LightingMode, RoomConfig, RoomShape, Window, WindowId, WindowPatch};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("wall `{wall}` does not exist on a {shape} room")]
    UnknownWall { wall: String, shape: RoomShape },
}

/// Saved arrangement: what persistence stores and loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub name: String,
    pub items: Vec<FurnitureItem>,
    #[serde(default)]
    pub room_config: RoomConfig,
    #[serde(default)]
    pub windows: Vec<Window>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    room: RoomConfig,
    windows: Vec<Window>,
    items: Vec<FurnitureItem>,
    selected: Option<ItemId>,
    next_id: ItemId,
    next_window_id: WindowId,
    revision: u64,
    room_revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl Scene {
    pub fn new(room: RoomConfig) -> Self {
        Self {
            room,
            windows: Vec::new(),
            items: Vec::new(),
            selected: None,
            next_id: 1,
            next_window_id: 1,
            revision: 0,
            room_revision: 0,
        }
    }

    pub fn room(&self) -> &RoomConfig {
        &self.room
    }

    pub fn items(&self) -> &[FurnitureItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&FurnitureItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|window| window.id == id)
    }

    pub fn windows_on<'a>(&'a self, wall: &'a str) -> impl Iterator<Item = &'a Window> + 'a {
        self.windows.iter().filter(move |window| window.wall == wall)
    }

    pub fn selected_id(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&FurnitureItem> {
        self.selected.and_then(|id| self.item(id))
    }

    /// Bumps on every mutation visible to the views.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Bumps only when room geometry inputs (shape, size, windows) change.
    pub fn room_revision(&self) -> u64 {
        self.room_revision
    }

    pub fn add(&mut self, kind: FurnitureKind) -> ItemId {
        let id = self.allocate_item_id();
        debug!(id, kind = %kind, "item added");
        self.items.push(FurnitureItem::new(id, kind));
        self.selected = Some(id);
        self.touch();
        id
    }

    /// Applies `patch` to the item. Returns `false` (and changes nothing)
    /// when the item no longer exists, e.g. a drag event racing a delete.
    pub fn update(&mut self, id: ItemId, patch: ItemPatch) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!(id, "update for missing item ignored");
            return false;
        };
        patch.apply_to(item);
        self.touch();
        true
    }

    pub fn remove(&mut self, id: ItemId) -> Option<FurnitureItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!(id, "item removed");
        self.touch();
        Some(removed)
    }

    /// Selects an item, or clears the selection with `None`. Selecting an
    /// id that is not in the scene clears the selection.
    pub fn select(&mut self, id: Option<ItemId>) {
        let next = id.filter(|id| self.item(*id).is_some());
        if next != self.selected {
            self.selected = next;
            self.touch();
        }
    }

    /// Changes the room shape. Windows on walls the new shape does not
    /// have are removed and returned.
    pub fn set_shape(&mut self, shape: RoomShape) -> Vec<Window> {
        if self.room.shape == shape {
            return Vec::new();
        }
        self.room.shape = shape;
        let (kept, dropped): (Vec<_>, Vec<_>) = std::mem::take(&mut self.windows)
            .into_iter()
            .partition(|window| shape.has_wall(&window.wall));
        self.windows = kept;
        for window in &dropped {
            warn!(window = window.id, wall = %window.wall, shape = %shape, "window dropped: wall no longer exists");
        }
        self.touch_room();
        dropped
    }

    pub fn set_dimensions(&mut self, width: f32, depth: f32) {
        if self.room.width != width || self.room.depth != depth {
            self.room.width = width;
            self.room.depth = depth;
            self.touch_room();
        }
    }

    pub fn set_wall_color(&mut self, color: Color) {
        self.room.wall_color = color;
        self.touch();
    }

    pub fn set_floor_color(&mut self, color: Color) {
        self.room.floor_color = color;
        self.touch();
    }

    pub fn set_lighting(&mut self, mode: LightingMode) {
        self.room.lighting_mode = mode;
        self.touch();
    }

    pub fn add_window(&mut self, wall: &str) -> Result<WindowId, SceneError> {
        if !self.room.shape.has_wall(wall) {
            return Err(SceneError::UnknownWall {
                wall: wall.to_string(),
                shape: self.room.shape,
            });
        }
        let id = self.next_window_id;
        self.next_window_id = self.next_window_id.saturating_add(1);
        self.windows.push(Window::new(id, wall));
        debug!(id, wall, "window added");
        self.touch_room();
        Ok(id)
    }

    /// Edits a window. Moving it to a wall the current shape lacks is
    /// rejected; a missing window id is a no-op returning `Ok(false)`.
    pub fn update_window(&mut self, id: WindowId, patch: WindowPatch) -> Result<bool, SceneError> {
        if let Some(wall) = &patch.wall {
            if !self.room.shape.has_wall(wall) {
                return Err(SceneError::UnknownWall {
                    wall: wall.clone(),
                    shape: self.room.shape,
                });
            }
        }
        let Some(window) = self.windows.iter_mut().find(|window| window.id == id) else {
            return Ok(false);
        };
        patch.apply_to(window);
        self.touch_room();
        Ok(true)
    }

    pub fn remove_window(&mut self, id: WindowId) -> Option<Window> {
        let index = self.windows.iter().position(|window| window.id == id)?;
        let removed = self.windows.remove(index);
        self.touch_room();
        Some(removed)
    }

    pub fn snapshot(&self, name: impl Into<String>) -> Design {
        Design {
            name: name.into(),
            items: self.items.clone(),
            room_config: self.room.clone(),
            windows: self.windows.clone(),
        }
    }

    /// Replaces items, room and windows in one step. Id counters move past
    /// every loaded id so fresh items never collide with loaded ones.
    pub fn replace_design(&mut self, design: Design) {
        let Design {
            name,
            items,
            room_config,
            windows,
        } = design;
        let max_item = items.iter().map(|item| item.id).max().unwrap_or(0);
        let max_window = windows.iter().map(|window| window.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_item.saturating_add(1));
        self.next_window_id = self.next_window_id.max(max_window.saturating_add(1));
        info!(name = %name, items = items.len(), windows = windows.len(), "design loaded");
        self.items = items;
        self.room = room_config;
        self.windows = windows;
        self.selected = None;
        self.touch_room();
    }

    fn allocate_item_id(&mut self) -> ItemId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn touch_room(&mut self) {
        self.room_revision = self.room_revision.wrapping_add(1);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::furniture::ItemColor;
    use crate::room::wall;

    #[test]
    fn add_selects_and_assigns_fresh_ids() {
        let mut scene = Scene::default();
        let a = scene.add(FurnitureKind::Chair);
        let b = scene.add(FurnitureKind::Lamp);
        assert_ne!(a, b);
        assert_eq!(scene.selected_id(), Some(b));
        assert_eq!(scene.item(b).map(|item| item.position), Some([0.0, 0.5, 0.0]));
    }

    #[test]
    fn repeated_color_update_leaves_transform_untouched() {
        let mut scene = Scene::default();
        let id = scene.add(FurnitureKind::Sofa);
        scene.update(id, ItemPatch::position([1.25, 0.5, -3.0]));
        let before = scene.item(id).cloned().unwrap();

        let color = ItemColor::Custom(Color::new("#334455"));
        assert!(scene.update(id, ItemPatch::color(color.clone())));
        assert!(scene.update(id, ItemPatch::color(color.clone())));

        let after = scene.item(id).unwrap();
        assert_eq!(after.position.map(f32::to_bits), before.position.map(f32::to_bits));
        assert_eq!(after.rotation.map(f32::to_bits), before.rotation.map(f32::to_bits));
        assert_eq!(after.scale.map(f32::to_bits), before.scale.map(f32::to_bits));
        assert_eq!(after.color, color);
    }

    #[test]
    fn update_on_missing_item_is_a_noop() {
        let mut scene = Scene::default();
        let id = scene.add(FurnitureKind::Bed);
        scene.remove(id);
        let revision = scene.revision();
        assert!(!scene.update(id, ItemPatch::position([1.0, 0.0, 1.0])));
        assert_eq!(scene.revision(), revision);
    }

    #[test]
    fn removing_selected_item_clears_selection() {
        let mut scene = Scene::default();
        let a = scene.add(FurnitureKind::Chair);
        let b = scene.add(FurnitureKind::Table);
        assert_eq!(scene.selected_id(), Some(b));

        scene.remove(a);
        assert_eq!(scene.selected_id(), Some(b));

        scene.remove(b);
        assert_eq!(scene.selected_id(), None);
    }

    #[test]
    fn selecting_missing_item_clears() {
        let mut scene = Scene::default();
        scene.add(FurnitureKind::Chair);
        scene.select(Some(999));
        assert_eq!(scene.selected_id(), None);
    }

    #[test]
    fn add_window_rejects_unknown_wall() {
        let mut scene = Scene::default();
        assert!(scene.add_window(wall::BACK).is_ok());
        assert_eq!(
            scene.add_window(wall::L_INNER_H),
            Err(SceneError::UnknownWall {
                wall: wall::L_INNER_H.to_string(),
                shape: RoomShape::Rectangle,
            })
        );
    }

    #[test]
    fn shape_change_drops_orphaned_windows() {
        let mut scene = Scene::default();
        scene.set_shape(RoomShape::LShape);
        let back = scene.add_window(wall::BACK).unwrap();
        let inner = scene.add_window(wall::L_INNER_V).unwrap();

        let dropped = scene.set_shape(RoomShape::Square);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, inner);
        assert!(scene.window(back).is_some());
        assert!(scene.window(inner).is_none());
    }

    #[test]
    fn dimension_change_keeps_windows() {
        let mut scene = Scene::default();
        let id = scene.add_window(wall::LEFT).unwrap();
        let revision = scene.room_revision();
        scene.set_dimensions(20.0, 12.0);
        assert!(scene.window(id).is_some());
        assert!(scene.room_revision() > revision);
    }

    #[test]
    fn replace_design_never_reuses_ids() {
        let mut scene = Scene::default();
        scene.add(FurnitureKind::Chair);

        let mut loaded = FurnitureItem::new(1_718_000_000_000, FurnitureKind::Bed);
        loaded.position = [2.0, 0.5, 2.0];
        scene.replace_design(Design {
            name: "bedroom".to_string(),
            items: vec![loaded],
            room_config: RoomConfig {
                shape: RoomShape::UShape,
                ..RoomConfig::default()
            },
            windows: vec![Window::new(7, wall::U_INNER_B)],
        });

        assert_eq!(scene.items().len(), 1);
        assert_eq!(scene.room().shape, RoomShape::UShape);
        assert_eq!(scene.selected_id(), None);

        let fresh = scene.add(FurnitureKind::Lamp);
        assert!(fresh > 1_718_000_000_000);
        let window = scene.add_window(wall::LEFT).unwrap();
        assert!(window > 7);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut scene = Scene::default();
        let id = scene.add(FurnitureKind::Cabinet);
        scene.update(id, ItemPatch::uniform_scale(1.5));
        scene.add_window(wall::RIGHT).unwrap();

        let design = scene.snapshot("study");
        let json = serde_json::to_string(&design).unwrap();
        let back: Design = serde_json::from_str(&json).unwrap();
        assert_eq!(design, back);
    }
}
