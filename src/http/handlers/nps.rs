use axum::{Json, extract::State, http::StatusCode};

use crate::{db::nps::list_tags, models::nps::NpsTag, state::AppState};

pub async fn list_tags_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<NpsTag>>, (StatusCode, String)> {
    let tags = list_tags(state.postgres()).await.map_err(|e| {
        tracing::error!("Error retrieving NPS tags: {}", e);
        e.to_response()
    })?;

    Ok(Json(tags))
}
