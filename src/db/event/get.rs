use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::{
        event::{Event, EventSort},
        page::{Page, PageWindow},
    },
};

const PLACE_FILTER: &str = "($1::text IS NULL OR p.slug = $1)";

pub async fn list_events(
    place_slug: Option<&str>,
    sort: EventSort,
    page: Option<&str>,
    postgres: &PgPool,
) -> Result<Page<Event>, AppError> {
    let total = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM events e JOIN places p ON p.id = e.place_id WHERE {PLACE_FILTER}"
    ))
    .bind(place_slug)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::db("Failed to count events", e))?;

    let window = PageWindow::resolve(page, total);

    let items = sqlx::query_as::<_, Event>(&format!(
        "SELECT e.* FROM events e
            JOIN places p ON p.id = e.place_id
            WHERE {PLACE_FILTER}
            ORDER BY {}
            LIMIT $2 OFFSET $3",
        sort.order_by()
    ))
    .bind(place_slug)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::db("Failed to list events", e))?;

    Ok(window.wrap(items, total))
}

pub async fn get_event_by_slug(slug: &str, postgres: &PgPool) -> Result<Event, AppError> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
        .bind(slug)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch event", e))?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", slug)))
}
