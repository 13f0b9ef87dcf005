//! Seams to the host's asset loader and renderer.

use crate::ViewError;
use room_core::{FurnitureKind, ModelAsset, PrimitiveShape};
use room_protocol::Thumbnail;
use tracing::warn;

/// What the renderer should draw for an item kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetRef {
    Model(ModelAsset),
    Primitive(PrimitiveShape),
}

pub trait AssetResolver {
    fn resolve(&self, kind: &FurnitureKind) -> AssetRef;
}

/// Models for the kinds that ship one, primitives for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogAssets;

impl AssetResolver for CatalogAssets {
    fn resolve(&self, kind: &FurnitureKind) -> AssetRef {
        kind.model()
            .map(AssetRef::Model)
            .unwrap_or_else(|| AssetRef::Primitive(kind.primitive()))
    }
}

/// Resolver that never uses models, for hosts without a model loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitivesOnly;

impl AssetResolver for PrimitivesOnly {
    fn resolve(&self, kind: &FurnitureKind) -> AssetRef {
        AssetRef::Primitive(kind.primitive())
    }
}

/// Still image of the current 3D view.
pub trait RenderCapture {
    fn capture(&mut self) -> Result<Thumbnail, ViewError>;
}

/// Runs the capture if there is one; any failure gives an empty thumbnail.
pub fn capture_thumbnail(capture: Option<&mut dyn RenderCapture>) -> Thumbnail {
    let Some(capture) = capture else {
        return Thumbnail::default();
    };
    match capture.capture() {
        Ok(thumbnail) => thumbnail,
        Err(err) => {
            warn!(%err, "thumbnail capture failed");
            Thumbnail::default()
        }
    }
}
