use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    auth::hash_password,
    db::slug::{SlugTable, unique_slug},
    errors::AppError,
    models::user::{Role, User},
    slug::slug_or_fallback,
};

pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Creates the user together with the profile matching its role.
pub async fn create_user(new: NewUser, postgres: PgPool) -> Result<User, AppError> {
    let email = new.email.trim().to_lowercase();

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&postgres)
        .await
        .map_err(|e| AppError::db("Failed to query user", e))?;

    if existing.is_some() {
        return Err(AppError::BadRequest(
            "A user with this email is already registered".into(),
        ));
    }

    let password_hash = hash_password(&new.password)?;
    let id = Uuid::now_v7();
    let base = if !new.first_name.is_empty() && !new.last_name.is_empty() {
        format!("{}-{}", new.first_name, new.last_name)
    } else {
        email.split('@').next().unwrap_or_default().to_string()
    };

    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::db("Failed to begin transaction", e))?;

    let slug = unique_slug(&mut *tx, SlugTable::Users, &slug_or_fallback(&base, "user", id)).await?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, first_name, last_name, role, password_hash, slug, date_joined)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, email, first_name, last_name, role, slug, date_joined",
    )
    .bind(id)
    .bind(&email)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.role)
    .bind(&password_hash)
    .bind(&slug)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::db("Failed to create user", e))?;

    let profile_sql = match user.role {
        Role::Gourmand => "INSERT INTO gourmand_profiles (user_id) VALUES ($1)",
        Role::Owner => "INSERT INTO owner_profiles (user_id) VALUES ($1)",
    };
    sqlx::query(profile_sql)
        .bind(user.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::db("Failed to create profile", e))?;

    tx.commit()
        .await
        .map_err(|e| AppError::db("Failed to commit user", e))?;

    tracing::info!("Created {:?} user {} ({})", user.role, user.email, user.id);

    Ok(user)
}
