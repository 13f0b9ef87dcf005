//! Persistence boundary: the saved-design schema, the request/response
//! messages exchanged with a design store, and the store contract itself.

use room_core::{Design, FurnitureItem, RoomConfig, Window};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub type UserId = String;
pub type DesignRecordId = u64;

/// Encoded still image of the 3D view. Opaque to the core; an empty
/// thumbnail means no capture was available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thumbnail(String);

impl Thumbnail {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDesignRequest {
    pub user_id: UserId,
    pub name: String,
    pub items: Vec<FurnitureItem>,
    pub room_config: RoomConfig,
    #[serde(default)]
    pub windows: Vec<Window>,
    #[serde(default)]
    pub thumbnail: Thumbnail,
}

impl SaveDesignRequest {
    pub fn new(user_id: impl Into<UserId>, design: Design, thumbnail: Thumbnail) -> Self {
        Self {
            user_id: user_id.into(),
            name: design.name,
            items: design.items,
            room_config: design.room_config,
            windows: design.windows,
            thumbnail,
        }
    }

    pub fn design(&self) -> Design {
        Design {
            name: self.name.clone(),
            items: self.items.clone(),
            room_config: self.room_config.clone(),
            windows: self.windows.clone(),
        }
    }
}

/// A design as the store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDesign {
    pub id: DesignRecordId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub design: Design,
    #[serde(default)]
    pub thumbnail: Thumbnail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreRequest {
    Save(SaveDesignRequest),
    Load {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreResponse {
    Saved { id: DesignRecordId },
    Designs { designs: Vec<StoredDesign> },
    Error { message: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("design store unavailable: {0}")]
    Unavailable(String),
    #[error("design rejected: {0}")]
    Rejected(String),
    #[error("malformed store payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// External collaborator that keeps saved designs. Calls are made outside
/// the interactive core; their results are fed back into the session.
pub trait DesignStore {
    fn save(&mut self, request: SaveDesignRequest) -> Result<DesignRecordId, StoreError>;

    /// All designs of `user`, oldest first.
    fn load(&self, user: &str) -> Result<Vec<StoredDesign>, StoreError>;

    fn handle(&mut self, request: StoreRequest) -> StoreResponse {
        let result = match request {
            StoreRequest::Save(request) => self.save(request).map(|id| StoreResponse::Saved { id }),
            StoreRequest::Load { user_id } => self
                .load(&user_id)
                .map(|designs| StoreResponse::Designs { designs }),
        };
        result.unwrap_or_else(|err| StoreResponse::Error {
            message: err.to_string(),
        })
    }
}

/// In-process store, used by tests and the command-line driver.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<StoredDesign>,
    next_id: DesignRecordId,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the backend were unreachable.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            warn!("memory store is offline");
            return Err(StoreError::Unavailable("offline".to_string()));
        }
        Ok(())
    }
}

impl DesignStore for MemoryStore {
    fn save(&mut self, request: SaveDesignRequest) -> Result<DesignRecordId, StoreError> {
        self.check_online()?;
        if request.name.trim().is_empty() {
            return Err(StoreError::Rejected("design name is empty".to_string()));
        }
        self.next_id = self.next_id.saturating_add(1);
        let id = self.next_id;
        debug!(id, user = %request.user_id, name = %request.name, "design stored");
        let design = request.design();
        self.records.push(StoredDesign {
            id,
            user_id: request.user_id,
            design,
            thumbnail: request.thumbnail,
        });
        Ok(id)
    }

    fn load(&self, user: &str) -> Result<Vec<StoredDesign>, StoreError> {
        self.check_online()?;
        Ok(self
            .records
            .iter()
            .filter(|record| record.user_id == user)
            .cloned()
            .collect())
    }
}

pub fn encode_request(request: &StoreRequest) -> Result<String, StoreError> {
    Ok(serde_json::to_string(request)?)
}

pub fn decode_response(text: &str) -> Result<StoreResponse, StoreError> {
    Ok(serde_json::from_str(text)?)
}
