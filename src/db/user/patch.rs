use sqlx::PgPool;
use uuid::Uuid;

use crate::{errors::AppError, models::user::Role};

pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub description: Option<String>,
}

/// Updates the user's names and the description on the profile of their role.
/// Missing fields keep their current value.
pub async fn update_profile(
    user_id: Uuid,
    role: Role,
    update: ProfileUpdate,
    postgres: PgPool,
) -> Result<(), AppError> {
    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::db("Failed to begin transaction", e))?;

    sqlx::query(
        "UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name)
            WHERE id = $1",
    )
    .bind(user_id)
    .bind(&update.first_name)
    .bind(&update.last_name)
    .execute(&mut *tx)
    .await
    .map_err(|e| AppError::db("Failed to update user", e))?;

    let profile_sql = match role {
        Role::Gourmand => {
            "UPDATE gourmand_profiles SET description = COALESCE($2, description) WHERE user_id = $1"
        }
        Role::Owner => {
            "UPDATE owner_profiles SET description = COALESCE($2, description) WHERE user_id = $1"
        }
    };
    sqlx::query(profile_sql)
        .bind(user_id)
        .bind(&update.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::db("Failed to update profile", e))?;

    tx.commit()
        .await
        .map_err(|e| AppError::db("Failed to commit profile", e))?;

    tracing::info!("Updated profile of user {}", user_id);
    Ok(())
}
