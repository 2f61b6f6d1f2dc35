use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::{
        Place,
        page::{Page, PageWindow},
        place::PlaceSort,
    },
};

pub async fn get_place_by_slug(slug: &str, postgres: &PgPool) -> Result<Place, AppError> {
    sqlx::query_as::<_, Place>("SELECT * FROM places WHERE slug = $1")
        .bind(slug)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch place", e))?
        .ok_or_else(|| AppError::NotFound(format!("Place '{}' not found", slug)))
}

/// Places whose name contains `query` (case-insensitive), one page at a time.
pub async fn list_places(
    query: Option<&str>,
    sort: PlaceSort,
    page: Option<&str>,
    postgres: &PgPool,
) -> Result<Page<Place>, AppError> {
    let pattern = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q.replace('%', "\\%").replace('_', "\\_")));

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM places WHERE ($1::text IS NULL OR name ILIKE $1)",
    )
    .bind(&pattern)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::db("Failed to count places", e))?;

    let window = PageWindow::resolve(page, total);

    let items = sqlx::query_as::<_, Place>(&format!(
        "SELECT * FROM places
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3",
        sort.order_by()
    ))
    .bind(&pattern)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::db("Failed to list places", e))?;

    Ok(window.wrap(items, total))
}
