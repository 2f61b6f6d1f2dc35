use sqlx::PgPool;

use crate::{errors::AppError, models::nps::NpsTag};

pub async fn list_tags(postgres: &PgPool) -> Result<Vec<NpsTag>, AppError> {
    sqlx::query_as::<_, NpsTag>("SELECT id, name, label FROM nps_tags ORDER BY id")
        .fetch_all(postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch NPS tags", e))
}
