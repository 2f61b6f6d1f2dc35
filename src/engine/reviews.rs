use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    engine::rating::{Recomputed, recompute_ratings},
    errors::AppError,
    models::{
        Review,
        nps::NpsResponse,
        review::NewReview,
    },
    slug,
    store::{Store, StoreTx},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReview {
    pub review: Review,
    pub nps: NpsResponse,
    pub ratings: Recomputed,
}

async fn unique_review_slug<T: StoreTx>(tx: &mut T, base: &str) -> Result<String, AppError> {
    let mut attempt = 0;
    loop {
        let slug = slug::candidate(base, attempt);
        if !tx.review_slug_exists(&slug).await? {
            return Ok(slug);
        }
        attempt += 1;
    }
}

/// Stores a review with its NPS answer and re-derives the place and author
/// ratings before committing.
pub async fn create_review<S: Store>(
    store: &S,
    author_id: Uuid,
    new: NewReview,
    now: DateTime<Utc>,
) -> Result<CreatedReview, AppError> {
    new.validate()?;

    let mut tx = store.begin().await?;

    if tx.find_place(new.place_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Place {} not found",
            new.place_id
        )));
    }

    let mut tag_names = new.nps_tags.clone();
    tag_names.sort();
    tag_names.dedup();
    let tags = tx.tags_by_name(&tag_names).await?;
    if tags.len() != tag_names.len() {
        let unknown: Vec<&str> = tag_names
            .iter()
            .filter(|name| !tags.iter().any(|t| &t.name == *name))
            .map(String::as_str)
            .collect();
        return Err(AppError::BadRequest(format!(
            "Unknown NPS tags: {}",
            unknown.join(", ")
        )));
    }

    let id = Uuid::now_v7();
    let base = slug::slug_or_fallback(
        &format!("{}-{}", new.name, slug::short_id(id)),
        "review",
        id,
    );
    let review = Review {
        id,
        place_id: new.place_id,
        gourmand_id: author_id,
        name: new.name.trim().to_string(),
        description: new.description,
        gourmand_rating: new.gourmand_rating,
        positive_rating: 0,
        negative_rating: 0,
        review_date: now,
        slug: unique_review_slug(&mut tx, &base).await?,
    };
    tx.insert_review(&review).await?;

    let nps = NpsResponse {
        id: Uuid::now_v7(),
        review_id: review.id,
        score: new.nps_score,
        created_at: now,
        tags,
    };
    tx.insert_nps_response(&nps).await?;

    let ratings = recompute_ratings(&mut tx, review.place_id, author_id).await?;
    tx.commit().await?;

    info!(
        "Review {} created by {} for place {} (place rating now {})",
        review.slug, author_id, review.place_id, ratings.place_rating
    );

    Ok(CreatedReview {
        review,
        nps,
        ratings,
    })
}
