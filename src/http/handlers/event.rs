use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    auth::AuthClaims,
    db::event::{create_event, get_event_by_slug, list_events},
    http::handlers::ListQuery,
    models::{
        event::{Event, EventPayload, EventSort},
        page::Page,
        user::Role,
    },
    state::AppState,
};

pub async fn list_events_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Event>>, (StatusCode, String)> {
    let place = query.place.as_deref().filter(|p| !p.is_empty());
    let sort = EventSort::parse(query.sort.as_deref());

    let events = list_events(place, sort, query.page.as_deref(), state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error listing events: {}", e);
            e.to_response()
        })?;

    Ok(Json(events))
}

pub async fn create_event_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<EventPayload>,
) -> Result<(StatusCode, Json<Event>), (StatusCode, String)> {
    let owner_id = claims.require_role(Role::Owner)?;

    let event = create_event(owner_id, payload, state.postgres().clone())
        .await
        .map_err(|e| {
            tracing::error!("Error creating event: {}", e);
            e.to_response()
        })?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Event>, (StatusCode, String)> {
    let event = get_event_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving event {}: {}", slug, e);
            e.to_response()
        })?;

    Ok(Json(event))
}
