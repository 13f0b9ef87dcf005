//! Full room layout: shape geometry plus every wall cut for its windows.

use crate::cutter::{cut_wall, WallBox, WallCut, WallSettings};
use crate::mesh::{unit_box, TriMesh};
use crate::shape::{compute_geometry, RoomGeometry, ShapeProportions, WallSegment};
use crate::GeomError;
use glam::{Mat4, Quat, Vec3};
use room_core::{RoomConfig, Window, WindowId};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallLayout {
    pub segment: WallSegment,
    pub cut: WallCut,
}

/// Oriented box ready for the 3D renderer. `size` is (thickness, height,
/// run length) in the wall's local frame; `yaw` turns local +Z onto the
/// wall direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallPiece {
    pub wall: &'static str,
    pub center: Vec3,
    pub size: Vec3,
    pub yaw: f32,
}

impl WallPiece {
    pub fn from_wall_box(segment: &WallSegment, bounds: &WallBox) -> Self {
        let c = bounds.center();
        Self {
            wall: segment.id,
            center: segment.to_world(c.x, c.y),
            size: Vec3::new(bounds.depth, bounds.height(), bounds.width()),
            yaw: segment.yaw(),
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size, Quat::from_rotation_y(self.yaw), self.center)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomLayout {
    pub geometry: RoomGeometry,
    pub walls: Vec<WallLayout>,
    /// Windows whose wall does not exist on the current shape. They are
    /// kept in the scene but produce no geometry.
    pub dormant: Vec<WindowId>,
    pub settings: WallSettings,
}

impl RoomLayout {
    pub fn build(
        room: &RoomConfig,
        windows: &[Window],
        proportions: &ShapeProportions,
        settings: &WallSettings,
    ) -> Self {
        let geometry = compute_geometry(room.shape, room.width, room.depth, proportions);
        let walls = geometry
            .walls
            .iter()
            .map(|segment| {
                let hosted: Vec<&Window> = windows.iter().filter(|w| w.wall == segment.id).collect();
                WallLayout {
                    segment: *segment,
                    cut: cut_wall(segment, &hosted, settings),
                }
            })
            .collect();
        let dormant: Vec<WindowId> = windows
            .iter()
            .filter(|w| geometry.wall(&w.wall).is_none())
            .map(|w| w.id)
            .collect();
        if !dormant.is_empty() {
            warn!(shape = %room.shape, ?dormant, "windows reference missing walls");
        }
        debug!(shape = %room.shape, walls = geometry.walls.len(), "room layout built");
        Self {
            geometry,
            walls,
            dormant,
            settings: *settings,
        }
    }

    pub fn wall(&self, id: &str) -> Option<&WallLayout> {
        self.walls.iter().find(|wall| wall.segment.id == id)
    }

    /// Every solid piece of wall: full-height runs between openings plus
    /// the fills below sills and above windows.
    pub fn pieces(&self) -> Vec<WallPiece> {
        let mut pieces = Vec::new();
        for wall in &self.walls {
            for [start, end] in wall.cut.solid_spans() {
                let bounds = WallBox {
                    along: [start, end],
                    vertical: [0.0, self.settings.height],
                    depth: self.settings.thickness,
                };
                pieces.push(WallPiece::from_wall_box(&wall.segment, &bounds));
            }
            for opening in &wall.cut.openings {
                for fill in opening.below_sill.iter().chain(opening.above.iter()) {
                    pieces.push(WallPiece::from_wall_box(&wall.segment, fill));
                }
            }
        }
        pieces
    }

    /// Tessellates all wall pieces into one mesh.
    pub fn wall_mesh(&self) -> Result<TriMesh, GeomError> {
        let pieces = self.pieces();
        if pieces.is_empty() {
            return Err(GeomError::NoWallPieces);
        }
        let unit = unit_box();
        let mut combined = TriMesh::default();
        for piece in &pieces {
            combined.append_transformed(&unit, piece.transform());
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::{wall, RoomShape};

    fn room(shape: RoomShape, width: f32, depth: f32) -> RoomConfig {
        RoomConfig {
            shape,
            width,
            depth,
            ..RoomConfig::default()
        }
    }

    fn build(room: &RoomConfig, windows: &[Window]) -> RoomLayout {
        RoomLayout::build(room, windows, &ShapeProportions::default(), &WallSettings::default())
    }

    #[test]
    fn windows_land_on_their_walls() {
        let windows = vec![Window::new(1, wall::BACK), Window::new(2, wall::LEFT)];
        let layout = build(&room(RoomShape::Rectangle, 10.0, 8.0), &windows);
        assert_eq!(layout.wall(wall::BACK).unwrap().cut.openings.len(), 1);
        assert_eq!(layout.wall(wall::LEFT).unwrap().cut.openings.len(), 1);
        assert!(layout.wall(wall::RIGHT).unwrap().cut.openings.is_empty());
        assert!(layout.dormant.is_empty());
    }

    #[test]
    fn orphan_windows_are_dormant() {
        let windows = vec![Window::new(9, wall::U_INNER_B)];
        let layout = build(&room(RoomShape::Rectangle, 10.0, 8.0), &windows);
        assert_eq!(layout.dormant, vec![9]);
        assert!(layout.walls.iter().all(|w| w.cut.openings.is_empty()));
    }

    #[test]
    fn pieces_include_sill_and_lintel_fills() {
        let windows = vec![Window::new(1, wall::BACK)];
        let layout = build(&room(RoomShape::Rectangle, 10.0, 8.0), &windows);
        // back: 2 runs + 2 fills, left and right: 1 run each
        assert_eq!(layout.pieces().len(), 6);
    }

    #[test]
    fn back_wall_piece_is_oriented_along_x() {
        let layout = build(&room(RoomShape::Rectangle, 10.0, 8.0), &[]);
        let back = layout
            .pieces()
            .into_iter()
            .find(|p| p.wall == wall::BACK)
            .unwrap();
        assert!((back.center - Vec3::new(0.0, 2.5, -4.0)).length() < 1.0e-5);
        let along = back.transform().transform_vector3(Vec3::Z);
        assert!((along - Vec3::new(10.0, 0.0, 0.0)).length() < 1.0e-4);
    }

    #[test]
    fn open_room_has_no_wall_mesh() {
        let layout = build(&room(RoomShape::Open, 10.0, 8.0), &[]);
        assert!(matches!(layout.wall_mesh(), Err(GeomError::NoWallPieces)));
    }

    #[test]
    fn wall_mesh_spans_the_room() {
        let layout = build(&room(RoomShape::Rectangle, 10.0, 8.0), &[]);
        let mesh = layout.wall_mesh().unwrap();
        let bounds = mesh.bounds();
        assert!((bounds.min[0] + 5.1).abs() < 1.0e-3);
        assert!((bounds.max[1] - 5.0).abs() < 1.0e-3);
    }
}
