//! Room geometry: shape outlines, wall cutting, blueprint mapping and the
//! meshes the 3D view draws.

pub mod cutter;
pub mod layout;
pub mod mapper;
pub mod mesh;
pub mod pick;
pub mod shape;

pub use cutter::{
    cut_wall, opening_half_width, FrameBar, FrameBarKind, LightShaft, Opening, WallBox, WallCut,
    WallSettings,
};
pub use layout::{RoomLayout, WallLayout, WallPiece};
pub use mapper::CoordinateMapper;
pub use mesh::{item_transform, primitive_mesh, Aabb, TriMesh};
pub use pick::{ItemHit, ItemPicker, Ray};
pub use shape::{compute_geometry, polygon_area, FloorTile, RoomGeometry, ShapeProportions, WallSegment};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeomError {
    #[error("room layout has no solid wall pieces")]
    NoWallPieces,
}
