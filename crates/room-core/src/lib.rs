//! Core model types shared by the geometry, views and persistence layers.

pub mod furniture;
pub mod room;
pub mod scene;

pub use furniture::{
    FurnitureItem, FurnitureKind, ItemColor, ItemId, ItemLight, ItemPatch, ModelAsset,
    PrimitiveShape,
};
pub use room::{
    wall, Color, LightingMode, RoomConfig, RoomShape, Window, WindowId, WindowPatch,
    ROOM_DIMENSION_RANGE,
};
pub use scene::{Design, Scene, SceneError};
