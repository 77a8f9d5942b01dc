use serde::{Deserialize, Serialize};

use crate::{Role, UserId};

/// Immutable profile of an authenticated user.
///
/// Only `id`, `first_name` and `role` are interpreted by the client core.
/// Anything else the API returns (contact info, avatar data) lands in
/// `extra` and is passed through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub first_name: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    pub fn new(id: UserId, first_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            role,
            extra: serde_json::Map::new(),
        }
    }
}
