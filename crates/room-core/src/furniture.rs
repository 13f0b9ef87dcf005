//! Furniture catalog and placed items.

use crate::room::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type ItemId = u64;

/// Item type tag. Unknown tags are kept verbatim so saved designs
/// round-trip, and get the generic defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FurnitureKind {
    CoffeeTable,
    Chair,
    Drawer,
    Table,
    Bed,
    Lamp,
    Sofa,
    Cabinet,
    Other(String),
}

/// Fallback geometry for items without a 3D model, in local meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    Box { w: f32, h: f32, d: f32 },
    Cone { r: f32, h: f32 },
}

/// Model asset with the uniform scale and vertical offset it needs to sit
/// at real-world size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelAsset {
    pub key: &'static str,
    pub scale: f32,
    pub y_offset: f32,
}

/// Point light attached to an item (lamps).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemLight {
    pub offset: [f32; 3],
    pub intensity: f32,
    pub distance: f32,
    pub color: &'static str,
}

impl FurnitureKind {
    /// The library, in display order.
    pub const CATALOG: [FurnitureKind; 8] = [
        FurnitureKind::CoffeeTable,
        FurnitureKind::Chair,
        FurnitureKind::Drawer,
        FurnitureKind::Table,
        FurnitureKind::Bed,
        FurnitureKind::Lamp,
        FurnitureKind::Sofa,
        FurnitureKind::Cabinet,
    ];

    pub fn tag(&self) -> &str {
        match self {
            FurnitureKind::CoffeeTable => "Coffee Table",
            FurnitureKind::Chair => "Chair",
            FurnitureKind::Drawer => "Drawer",
            FurnitureKind::Table => "Table",
            FurnitureKind::Bed => "Bed",
            FurnitureKind::Lamp => "Lamp",
            FurnitureKind::Sofa => "Sofa",
            FurnitureKind::Cabinet => "Cabinet",
            FurnitureKind::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Coffee Table" => FurnitureKind::CoffeeTable,
            "Chair" => FurnitureKind::Chair,
            "Drawer" => FurnitureKind::Drawer,
            "Table" => FurnitureKind::Table,
            "Bed" => FurnitureKind::Bed,
            "Lamp" => FurnitureKind::Lamp,
            "Sofa" => FurnitureKind::Sofa,
            "Cabinet" => FurnitureKind::Cabinet,
            other => FurnitureKind::Other(other.to_string()),
        }
    }

    /// Blueprint footprint (width along X, depth along Z) in meters.
    pub fn footprint(&self) -> (f32, f32) {
        match self {
            FurnitureKind::CoffeeTable => (1.2, 1.2),
            FurnitureKind::Chair => (0.6, 0.6),
            FurnitureKind::Drawer => (1.0, 0.5),
            FurnitureKind::Table => (1.5, 1.0),
            FurnitureKind::Bed => (2.0, 3.0),
            FurnitureKind::Lamp => (0.4, 0.4),
            FurnitureKind::Sofa => (2.5, 1.0),
            FurnitureKind::Cabinet => (1.0, 0.8),
            FurnitureKind::Other(_) => (0.5, 0.5),
        }
    }

    /// Color used when the item's own color is unset.
    pub fn type_color(&self) -> Color {
        let hex = match self {
            FurnitureKind::CoffeeTable => "#a0522d",
            FurnitureKind::Chair => "#4a90d9",
            FurnitureKind::Drawer => "#8b6914",
            FurnitureKind::Table => "#7c6f64",
            FurnitureKind::Bed => "#6a5acd",
            FurnitureKind::Lamp => "#ffa500",
            FurnitureKind::Sofa => "#3cb371",
            FurnitureKind::Cabinet => "#808080",
            FurnitureKind::Other(_) => ItemColor::UNSET_SENTINEL,
        };
        Color::new(hex)
    }

    /// Vertical offset and color a freshly added item starts with.
    pub fn placement_defaults(&self) -> (f32, ItemColor) {
        match self {
            FurnitureKind::CoffeeTable | FurnitureKind::Chair | FurnitureKind::Drawer => {
                (0.0, ItemColor::Unset)
            }
            FurnitureKind::Lamp => (0.5, ItemColor::Custom(Color::new("#ffaa00"))),
            _ => (0.5, ItemColor::Unset),
        }
    }

    pub fn model(&self) -> Option<ModelAsset> {
        let (key, scale) = match self {
            FurnitureKind::CoffeeTable => ("coffee_table", 2.5),
            FurnitureKind::Chair => ("chair", 2.0),
            FurnitureKind::Drawer => ("drawer", 2.5),
            _ => return None,
        };
        Some(ModelAsset {
            key,
            scale,
            y_offset: 0.0,
        })
    }

    pub fn primitive(&self) -> PrimitiveShape {
        match self {
            FurnitureKind::Table => PrimitiveShape::Box {
                w: 1.5,
                h: 0.1,
                d: 1.0,
            },
            FurnitureKind::Bed => PrimitiveShape::Box {
                w: 2.0,
                h: 0.5,
                d: 3.0,
            },
            FurnitureKind::Cabinet => PrimitiveShape::Box {
                w: 1.0,
                h: 2.0,
                d: 0.8,
            },
            FurnitureKind::Lamp => PrimitiveShape::Cone { r: 0.3, h: 1.0 },
            FurnitureKind::Sofa => PrimitiveShape::Box {
                w: 2.5,
                h: 0.6,
                d: 1.0,
            },
            _ => PrimitiveShape::Box {
                w: 0.5,
                h: 0.5,
                d: 0.5,
            },
        }
    }

    pub fn light(&self) -> Option<ItemLight> {
        match self {
            FurnitureKind::Lamp => Some(ItemLight {
                offset: [0.0, 0.5, 0.0],
                intensity: 2.0,
                distance: 8.0,
                color: "#ffddaa",
            }),
            _ => None,
        }
    }
}

impl From<String> for FurnitureKind {
    fn from(value: String) -> Self {
        Self::from_tag(&value)
    }
}

impl From<FurnitureKind> for String {
    fn from(value: FurnitureKind) -> Self {
        match value {
            FurnitureKind::Other(tag) => tag,
            known => known.tag().to_string(),
        }
    }
}

impl fmt::Display for FurnitureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Item color; `Unset` means "use the type default" and is stored as the
/// `#888888` sentinel on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemColor {
    #[default]
    Unset,
    Custom(Color),
}

impl ItemColor {
    pub const UNSET_SENTINEL: &'static str = "#888888";

    pub fn custom(&self) -> Option<&Color> {
        match self {
            ItemColor::Unset => None,
            ItemColor::Custom(color) => Some(color),
        }
    }
}

impl From<String> for ItemColor {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case(Self::UNSET_SENTINEL) {
            ItemColor::Unset
        } else {
            ItemColor::Custom(Color::new(value))
        }
    }
}

impl From<ItemColor> for String {
    fn from(value: ItemColor) -> Self {
        match value {
            ItemColor::Unset => ItemColor::UNSET_SENTINEL.to_string(),
            ItemColor::Custom(color) => color.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: FurnitureKind,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub color: ItemColor,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl FurnitureItem {
    pub fn new(id: ItemId, kind: FurnitureKind) -> Self {
        let (y, color) = kind.placement_defaults();
        Self {
            id,
            kind,
            position: [0.0, y, 0.0],
            rotation: [0.0; 3],
            scale: unit_scale(),
            color,
        }
    }

    /// Custom color if set, otherwise the type color.
    pub fn display_color(&self) -> Color {
        match &self.color {
            ItemColor::Custom(color) => color.clone(),
            ItemColor::Unset => self.kind.type_color(),
        }
    }

    pub fn yaw(&self) -> f32 {
        self.rotation[1]
    }

    fn apply(&mut self, patch: &ItemPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(scale) = patch.scale {
            self.scale = scale;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }
}

/// Partial item update. Vectors are replaced whole, never per component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub position: Option<[f32; 3]>,
    pub rotation: Option<[f32; 3]>,
    pub scale: Option<[f32; 3]>,
    pub color: Option<ItemColor>,
}

impl ItemPatch {
    pub fn position(position: [f32; 3]) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn color(color: ItemColor) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Rotation editor: only the vertical axis is exposed.
    pub fn yaw(item: &FurnitureItem, yaw: f32) -> Self {
        let [x, _, z] = item.rotation;
        Self {
            rotation: Some([x, yaw, z]),
            ..Self::default()
        }
    }

    pub fn uniform_scale(scale: f32) -> Self {
        Self {
            scale: Some([scale; 3]),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.color.is_none()
    }

    pub(crate) fn apply_to(&self, item: &mut FurnitureItem) {
        item.apply(self);
    }
}
