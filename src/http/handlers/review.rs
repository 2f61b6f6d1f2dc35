use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Serialize;

use crate::{
    auth::AuthClaims,
    db::review::{ReviewFilter, get_review_by_slug, get_review_id_by_slug, list_reviews},
    engine::{
        cast_named_vote,
        reviews::{CreatedReview, create_review},
        voting::{VoteOutcome, VoteState, vote_state},
    },
    errors::AppError,
    http::handlers::ListQuery,
    models::{
        Review,
        page::Page,
        review::{NewReview, ReviewSort, ReviewWithNps},
        user::Role,
    },
    state::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStateResponse {
    pub review_id: uuid::Uuid,
    pub state: VoteState,
}

pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Review>>, (StatusCode, String)> {
    let filter = match query.place.as_deref() {
        Some(place) if !place.is_empty() => ReviewFilter::PlaceSlug(place),
        _ => ReviewFilter::All,
    };
    let sort = ReviewSort::parse(query.sort.as_deref());

    let reviews = list_reviews(filter, sort, query.page.as_deref(), state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error listing reviews: {}", e);
            e.to_response()
        })?;

    Ok(Json(reviews))
}

pub async fn create_review_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Json(payload): Json<NewReview>,
) -> Result<(StatusCode, Json<CreatedReview>), (StatusCode, String)> {
    let author_id = claims.require_role(Role::Gourmand)?;

    let created = create_review(&state.store, author_id, payload, Utc::now())
        .await
        .map_err(|e| {
            tracing::error!("Error creating review: {}", e);
            e.to_response()
        })?;

    tracing::info!(
        "Review {} created by {} (place rating now {})",
        created.review.slug,
        author_id,
        created.ratings.place_rating
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_review_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ReviewWithNps>, (StatusCode, String)> {
    let review = get_review_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving review {}: {}", slug, e);
            e.to_response()
        })?;

    Ok(Json(review))
}

pub async fn get_vote_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path(slug): Path<String>,
) -> Result<Json<VoteStateResponse>, (StatusCode, String)> {
    let user_id = claims.user_id()?;

    let review_id = get_review_id_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| e.to_response())?;

    let vote = vote_state(&state.store, review_id, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Error reading vote on {}: {}", slug, e);
            e.to_response()
        })?;

    Ok(Json(VoteStateResponse {
        review_id,
        state: vote,
    }))
}

pub async fn vote_handler(
    State(state): State<AppState>,
    claims: AuthClaims,
    Path((slug, vote_type)): Path<(String, String)>,
) -> Result<Json<VoteOutcome>, (StatusCode, String)> {
    let voter_id = claims.require_role(Role::Gourmand)?;

    let review_id = get_review_id_by_slug(&slug, state.postgres())
        .await
        .map_err(|e| e.to_response())?;

    let outcome = cast_named_vote(&state.store, review_id, voter_id, &vote_type)
        .await
        .map_err(|e| {
            match e {
                AppError::BadRequest(_) => tracing::warn!("Rejected vote on {}: {}", slug, e),
                _ => tracing::error!("Error casting vote on {}: {}", slug, e),
            }
            e.to_response()
        })?;

    Ok(Json(outcome))
}
