use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::{
    db::{
        gourmand::{GourmandSort, list_gourmands},
        review::{ReviewFilter, list_reviews},
        user::{get::get_gourmand_profile, get_user_by_slug},
    },
    http::handlers::ListQuery,
    models::{
        Review, User,
        page::Page,
        review::ReviewSort,
        user::{GourmandProfile, GourmandSummary},
    },
    state::AppState,
};

#[derive(Serialize)]
pub struct GourmandView {
    pub user: User,
    pub profile: GourmandProfile,
}

pub async fn list_gourmands_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<GourmandSummary>>, (StatusCode, String)> {
    let sort = GourmandSort::parse(query.sort.as_deref());
    let gourmands = list_gourmands(sort, query.page.as_deref(), state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error listing gourmands: {}", e);
            e.to_response()
        })?;

    Ok(Json(gourmands))
}

pub async fn get_gourmand_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GourmandView>, (StatusCode, String)> {
    let user = get_user_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| e.to_response())?;

    let profile = get_gourmand_profile(user.id, state.postgres())
        .await
        .map_err(|e| {
            tracing::warn!("No gourmand profile for {}: {}", slug, e);
            e.to_response()
        })?;

    Ok(Json(GourmandView { user, profile }))
}

pub async fn get_gourmand_reviews_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Review>>, (StatusCode, String)> {
    let sort = ReviewSort::parse(query.sort.as_deref());
    let reviews = list_reviews(
        ReviewFilter::AuthorSlug(&slug),
        sort,
        query.page.as_deref(),
        state.postgres(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Error listing reviews of {}: {}", slug, e);
        e.to_response()
    })?;

    Ok(Json(reviews))
}
