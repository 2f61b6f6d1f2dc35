use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::slug::{SlugTable, unique_slug},
    errors::AppError,
    models::event::{Event, EventPayload},
    slug::slug_or_fallback,
};

/// Only the owner of the place may announce events there.
pub async fn create_event(
    owner_id: Uuid,
    payload: EventPayload,
    postgres: PgPool,
) -> Result<Event, AppError> {
    payload.validate().map_err(AppError::BadRequest)?;

    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::db("Failed to begin transaction", e))?;

    let place_owner = sqlx::query_scalar::<_, Option<Uuid>>("SELECT owner_id FROM places WHERE id = $1")
        .bind(payload.place_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::db("Failed to fetch place", e))?
        .ok_or_else(|| AppError::NotFound("Place not found".into()))?;

    if place_owner != Some(owner_id) {
        return Err(AppError::Forbidden(
            "Events can only be added to your own places".into(),
        ));
    }

    let id = Uuid::now_v7();
    let slug = unique_slug(
        &mut *tx,
        SlugTable::Events,
        &slug_or_fallback(&payload.name, "event", id),
    )
    .await?;

    let event = sqlx::query_as::<_, Event>(
        "INSERT INTO events (id, name, description, event_date, place_id, owner_id, is_weekly, day_of_week, slug)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *",
    )
    .bind(id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(payload.event_date)
    .bind(payload.place_id)
    .bind(owner_id)
    .bind(payload.is_weekly)
    .bind(payload.day_of_week)
    .bind(&slug)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::db("Failed to create event", e))?;

    tx.commit()
        .await
        .map_err(|e| AppError::db("Failed to commit event", e))?;

    tracing::info!("Created event {} at place {}", event.slug, event.place_id);

    Ok(event)
}
