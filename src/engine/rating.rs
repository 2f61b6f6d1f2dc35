use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::review::{RatedReview, VoteTally},
    store::{RatedEntity, StoreTx},
};

/// Highest rating a place or gourmand can hold.
pub const MAX_RATING: f64 = 5.0;

/// Smallest weight modifier a review can get from its vote balance.
pub const MIN_VOTE_MODIFIER: f64 = 0.1;

/// Rounds half to even at one decimal place, starting from the shortest
/// decimal form of `value` so `1.6500000000000001` rounds up.
pub fn quantize(value: f64) -> f64 {
    Decimal::from_str(&value.to_string())
        .ok()
        .and_then(|d| {
            d.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven)
                .to_f64()
        })
        .unwrap_or(value)
}

/// Share of positive votes across every review of a gourmand, scaled to
/// `[0, 5]`. No votes at all yields exactly `0.0`.
pub fn gourmand_rating(tallies: impl IntoIterator<Item = VoteTally>) -> f64 {
    let (positive, negative) = tallies
        .into_iter()
        .fold((0i64, 0i64), |(pos, neg), t| {
            (pos + i64::from(t.positive), neg + i64::from(t.negative))
        });

    let total = positive + negative;
    if total > 0 {
        (positive as f64 / total as f64) * MAX_RATING
    } else {
        0.0
    }
}

/// Weight a review carries in its place's average.
///
/// Reviews without an author rating or whose author has no profile carry no
/// weight at all and are skipped by [`place_rating`].
pub fn review_weight(review: &RatedReview) -> Option<f64> {
    review.review.gourmand_rating?;
    let reputation = review.author_reputation?;
    let net = review.review.positive_rating - review.review.negative_rating + 1;
    let modifier = f64::from(net).max(MIN_VOTE_MODIFIER);
    Some(reputation * modifier)
}

/// Reputation and vote weighted average of the author ratings, quantized to
/// one decimal.
pub fn place_rating(reviews: &[RatedReview]) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for review in reviews {
        let (Some(rating), Some(weight)) = (review.review.gourmand_rating, review_weight(review))
        else {
            continue;
        };
        weighted_sum += f64::from(rating) * weight;
        weight_sum += weight;
    }

    if weight_sum > 0.0 {
        quantize(weighted_sum / weight_sum)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recomputed {
    pub place_rating: f64,
    pub gourmand_rating: f64,
}

/// Re-derives the ratings touched by a change to one review: first the place,
/// then the author's reputation.
pub async fn recompute_ratings<T: StoreTx>(
    tx: &mut T,
    place_id: Uuid,
    author_id: Uuid,
) -> Result<Recomputed, AppError> {
    let place_reviews = tx.reviews_for_place(place_id).await?;
    let place = place_rating(&place_reviews);
    tx.save_rating(RatedEntity::Place(place_id), place).await?;

    let authored = tx.reviews_for_user(author_id).await?;
    let gourmand = quantize(gourmand_rating(authored.iter().map(|r| r.tally())));
    tx.save_rating(RatedEntity::Gourmand(author_id), gourmand)
        .await?;

    debug!(
        "Recomputed ratings: place {} -> {}, gourmand {} -> {}",
        place_id, place, author_id, gourmand
    );

    Ok(Recomputed {
        place_rating: place,
        gourmand_rating: gourmand,
    })
}
