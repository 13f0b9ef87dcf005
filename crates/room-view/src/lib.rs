//! Interactive views over a [`room_core::Scene`]: the 2D blueprint, the 3D
//! orbit viewport with its transform gizmo, and the session tying them to
//! save and load.
//!
//! Views turn pointer input into scene operations and produce plain frame
//! descriptions. Drawing them is left to the host.

pub mod assets;
pub mod blueprint;
pub mod cache;
pub mod camera;
pub mod config;
pub mod drag;
pub mod gizmo;
pub mod lighting;
pub mod session;
pub mod view;
pub mod viewport;

pub use assets::{capture_thumbnail, AssetRef, AssetResolver, CatalogAssets, PrimitivesOnly, RenderCapture};
pub use blueprint::{BlueprintFrame, BlueprintItem, BlueprintView, DimensionLabel, WindowMark};
pub use camera::OrbitCamera;
pub use config::{BlueprintSettings, CameraSettings, PlannerConfig};
pub use drag::{BlueprintGrab, DragController, DragState, GizmoGrab, Grab, ItemPose};
pub use gizmo::{GizmoFrame, GizmoHandle, GizmoMode};
pub use lighting::{Backdrop, KeyLight, LightingPreset};
pub use session::{Notification, NotificationLevel, Session};
pub use view::{PointerButton, PointerEvent, SceneView, ViewKind, ViewMode, ViewResponse};
pub use viewport::{ItemInstance, PointLight, SceneFrame, Viewport3d};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invalid planner config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("design name must not be empty")]
    EmptyDesignName,

    #[error("render capture failed: {0}")]
    Capture(String),
}
