use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_length;
use crate::error::AppError;

/// Mirror of an external account, pushed by the identity provider.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpsertIdentityRequest {
    #[schema(example = "alice")]
    pub username: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct IdentityResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "alice")]
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for IdentityResponse {
    fn from(m: crate::entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_upsert_identity(req: &UpsertIdentityRequest) -> Result<(), AppError> {
    validate_length("Username", &req.username, 1, 150)
}
