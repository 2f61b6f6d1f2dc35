use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Gourmand,
    Owner,
}

impl Role {
    pub fn is_gourmand(self) -> bool {
        self == Role::Gourmand
    }

    pub fn is_owner(self) -> bool {
        self == Role::Owner
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub slug: String,
    pub date_joined: DateTime<Utc>,
}

/// Reputation profile of a reviewer. `rating` is derived from the votes on
/// the user's reviews and always stays within `[0, 5]`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GourmandProfile {
    pub user_id: Uuid,
    pub description: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub user_id: Uuid,
    pub description: String,
}

/// Row used by the gourmand listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GourmandSummary {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub slug: String,
    pub description: String,
    pub rating: f64,
    pub date_joined: DateTime<Utc>,
    pub review_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID
    pub role: Role,
    pub exp: usize, // expiration time
}
