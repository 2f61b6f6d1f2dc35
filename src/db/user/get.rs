use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::user::{GourmandProfile, OwnerProfile, User},
};

const USER_COLUMNS: &str = "id, email, first_name, last_name, role, slug, date_joined";

#[derive(FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

pub async fn get_user_by_id(user_id: Uuid, postgres: &PgPool) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch user", e))?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

pub async fn get_user_by_slug(slug: &str, postgres: &PgPool) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE slug = $1"))
        .bind(slug)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch user", e))?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", slug)))
}

pub async fn get_credentials(
    email: &str,
    postgres: &PgPool,
) -> Result<Option<UserCredentials>, AppError> {
    sqlx::query_as::<_, UserCredentials>(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::db("Failed to fetch credentials", e))
}

pub async fn get_gourmand_profile(
    user_id: Uuid,
    postgres: &PgPool,
) -> Result<GourmandProfile, AppError> {
    sqlx::query_as::<_, GourmandProfile>(
        "SELECT user_id, description, rating FROM gourmand_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::db("Failed to fetch gourmand profile", e))?
    .ok_or_else(|| AppError::NotFound("Gourmand profile not found".into()))
}

pub async fn get_owner_profile(user_id: Uuid, postgres: &PgPool) -> Result<OwnerProfile, AppError> {
    sqlx::query_as::<_, OwnerProfile>(
        "SELECT user_id, description FROM owner_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::db("Failed to fetch owner profile", e))?
    .ok_or_else(|| AppError::NotFound("Owner profile not found".into()))
}
