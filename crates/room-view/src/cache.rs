//! Room layout cached between frames.

use room_core::Scene;
use room_geom::{RoomLayout, ShapeProportions, WallSettings};

/// Room layout rebuilt only when the scene's room or windows changed.
#[derive(Debug, Clone)]
pub struct LayoutCache {
    proportions: ShapeProportions,
    walls: WallSettings,
    revision: Option<u64>,
    layout: Option<RoomLayout>,
}

impl LayoutCache {
    pub fn new(proportions: ShapeProportions, walls: WallSettings) -> Self {
        Self {
            proportions,
            walls,
            revision: None,
            layout: None,
        }
    }

    pub fn wall_settings(&self) -> &WallSettings {
        &self.walls
    }

    pub fn get(&mut self, scene: &Scene) -> &RoomLayout {
        let revision = scene.room_revision();
        if self.revision != Some(revision) {
            self.layout = None;
            self.revision = Some(revision);
        }
        let (proportions, walls) = (self.proportions, self.walls);
        self.layout
            .get_or_insert_with(|| RoomLayout::build(scene.room(), scene.windows(), &proportions, &walls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::{wall, RoomShape};

    #[test]
    fn rebuilds_after_room_changes() {
        let mut scene = Scene::default();
        let mut cache = LayoutCache::new(ShapeProportions::default(), WallSettings::default());
        assert_eq!(cache.get(&scene).walls.len(), 3);

        scene.set_shape(RoomShape::LShape);
        assert_eq!(cache.get(&scene).walls.len(), 5);

        scene.add_window(wall::L_INNER_V).unwrap();
        let layout = cache.get(&scene);
        assert_eq!(layout.wall(wall::L_INNER_V).unwrap().cut.openings.len(), 1);
    }
}
