use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Place, place::PlacePayload},
};

/// Replaces the editable fields of a place. Rating, owner and slug stay as
/// they are.
pub async fn update_place(
    slug: &str,
    owner_id: Uuid,
    payload: PlacePayload,
    postgres: PgPool,
) -> Result<Place, AppError> {
    payload.validate().map_err(AppError::BadRequest)?;

    let current_owner = sqlx::query_scalar::<_, Option<Uuid>>("SELECT owner_id FROM places WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch place", e))?
        .ok_or_else(|| AppError::NotFound(format!("Place '{}' not found", slug)))?;

    if current_owner != Some(owner_id) {
        return Err(AppError::Forbidden(
            "Only the owner can edit this place".into(),
        ));
    }

    let place = sqlx::query_as::<_, Place>(
        "UPDATE places
            SET name = $2, description = $3, place_email = $4, location = $5, phone = $6, website = $7
            WHERE slug = $1
            RETURNING *",
    )
    .bind(slug)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.place_email)
    .bind(&payload.location)
    .bind(&payload.phone)
    .bind(&payload.website)
    .fetch_one(&postgres)
    .await
    .map_err(|e| AppError::db("Failed to update place", e))?;

    tracing::info!("Updated place {} ({})", place.name, place.id);

    Ok(place)
}
