use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    auth::AuthClaims,
    db::{
        place::{create_place, get_place_by_slug, list_places, update_place},
        review::{ReviewFilter, list_reviews},
    },
    engine::dashboard::analytics_for_owner,
    http::handlers::ListQuery,
    models::{
        Place, Review,
        nps::PlaceAnalytics,
        page::Page,
        place::{PlacePayload, PlaceSort},
        review::ReviewSort,
        user::Role,
    },
    state::AppState,
};

pub async fn list_places_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Place>>, (StatusCode, String)> {
    let sort = PlaceSort::parse(query.sort.as_deref());
    let places = list_places(query.q.as_deref(), sort, query.page.as_deref(), state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error listing places: {}", e);
            e.to_response()
        })?;

    tracing::info!("Retrieved {} places (page {})", places.items.len(), places.page);
    Ok(Json(places))
}

pub async fn create_place_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<PlacePayload>,
) -> Result<(StatusCode, Json<Place>), (StatusCode, String)> {
    let owner_id = claims.require_role(Role::Owner)?;

    let place = create_place(owner_id, payload, state.postgres().clone())
        .await
        .map_err(|e| {
            tracing::error!("Error creating place: {}", e);
            e.to_response()
        })?;

    Ok((StatusCode::CREATED, Json(place)))
}

pub async fn get_place_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Place>, (StatusCode, String)> {
    let place = get_place_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving place {}: {}", slug, e);
            e.to_response()
        })?;

    Ok(Json(place))
}

pub async fn update_place_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(slug): Path<String>,
    Json(payload): Json<PlacePayload>,
) -> Result<Json<Place>, (StatusCode, String)> {
    let owner_id = claims.require_role(Role::Owner)?;

    let place = update_place(&slug, owner_id, payload, state.postgres().clone())
        .await
        .map_err(|e| {
            tracing::error!("Error updating place {}: {}", slug, e);
            e.to_response()
        })?;

    Ok(Json(place))
}

pub async fn get_place_reviews_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Review>>, (StatusCode, String)> {
    let place = get_place_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| e.to_response())?;

    let sort = ReviewSort::parse(query.sort.as_deref());
    let reviews = list_reviews(
        ReviewFilter::PlaceSlug(&place.slug),
        sort,
        query.page.as_deref(),
        state.postgres(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Error listing reviews of place {}: {}", slug, e);
        e.to_response()
    })?;

    Ok(Json(reviews))
}

pub async fn get_place_analytics_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(slug): Path<String>,
) -> Result<Json<PlaceAnalytics>, (StatusCode, String)> {
    let owner_id = claims.require_role(Role::Owner)?;

    let place = get_place_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| e.to_response())?;

    let analytics = analytics_for_owner(&state.store, place.id, owner_id, Utc::now())
        .await
        .map_err(|e| {
            tracing::warn!("Analytics for {} refused or failed: {}", slug, e);
            e.to_response()
        })?;

    Ok(Json(analytics))
}
