use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::slug::{SlugTable, unique_slug},
    errors::AppError,
    models::{Place, place::PlacePayload},
    slug::slug_or_fallback,
};

pub async fn create_place(
    owner_id: Uuid,
    payload: PlacePayload,
    postgres: PgPool,
) -> Result<Place, AppError> {
    payload.validate().map_err(AppError::BadRequest)?;

    let id = Uuid::now_v7();
    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::db("Failed to begin transaction", e))?;

    let slug = unique_slug(
        &mut *tx,
        SlugTable::Places,
        &slug_or_fallback(&payload.name, "place", id),
    )
    .await?;

    let place = sqlx::query_as::<_, Place>(
        "INSERT INTO places (id, name, description, place_email, location, phone, website, rating, owner_id, slug)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9)
        RETURNING *",
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.place_email)
    .bind(&payload.location)
    .bind(&payload.phone)
    .bind(&payload.website)
    .bind(owner_id)
    .bind(&slug)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::db("Failed to create place", e))?;

    tx.commit()
        .await
        .map_err(|e| AppError::db("Failed to commit place", e))?;

    tracing::info!("Created place {} ({}) for owner {}", place.name, place.id, owner_id);

    Ok(place)
}
