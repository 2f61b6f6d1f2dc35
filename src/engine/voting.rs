use std::str::FromStr;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    engine::rating::recompute_ratings,
    errors::AppError,
    models::{Review, review::VoteType},
    store::{Store, StoreTx},
};

/// Where a voter stands on a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteState {
    NoVote,
    VotedPositive,
    VotedNegative,
}

impl From<Option<VoteType>> for VoteState {
    fn from(vote: Option<VoteType>) -> Self {
        match vote {
            None => VoteState::NoVote,
            Some(VoteType::Positive) => VoteState::VotedPositive,
            Some(VoteType::Negative) => VoteState::VotedNegative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// The author voting on their own review; nothing happens.
    SelfVote,
    /// Same vote cast again; nothing happens.
    Repeat,
    Cast(VoteType),
    Switch { from: VoteType, to: VoteType },
}

pub fn plan_vote(
    author_id: Uuid,
    voter_id: Uuid,
    current: Option<VoteType>,
    requested: VoteType,
) -> VoteTransition {
    if author_id == voter_id {
        return VoteTransition::SelfVote;
    }
    match current {
        None => VoteTransition::Cast(requested),
        Some(existing) if existing == requested => VoteTransition::Repeat,
        Some(existing) => VoteTransition::Switch {
            from: existing,
            to: requested,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Cast,
    Switched,
    Unchanged,
    Ignored,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub action: VoteAction,
    pub state: VoteState,
    pub review_id: Uuid,
    pub positive_rating: i32,
    pub negative_rating: i32,
    /// Present only when the vote changed the counters.
    pub place_rating: Option<f64>,
}

impl VoteOutcome {
    fn untouched(action: VoteAction, state: VoteState, review: &Review) -> Self {
        Self {
            action,
            state,
            review_id: review.id,
            positive_rating: review.positive_rating,
            negative_rating: review.negative_rating,
            place_rating: None,
        }
    }
}

/// Applies a vote to a review and re-derives the affected ratings in one
/// transaction. The review stays locked for the whole sequence, so a
/// concurrent duplicate observes the committed vote and becomes a no-op.
pub async fn cast_vote<S: Store>(
    store: &S,
    review_id: Uuid,
    voter_id: Uuid,
    requested: VoteType,
) -> Result<VoteOutcome, AppError> {
    apply_vote(store, review_id, voter_id, || Ok(requested)).await
}

/// Same as [`cast_vote`] with the vote type still in its path form. An unknown
/// review is reported before an unknown vote type.
pub async fn cast_named_vote<S: Store>(
    store: &S,
    review_id: Uuid,
    voter_id: Uuid,
    vote_type: &str,
) -> Result<VoteOutcome, AppError> {
    apply_vote(store, review_id, voter_id, || VoteType::from_str(vote_type)).await
}

async fn apply_vote<S: Store>(
    store: &S,
    review_id: Uuid,
    voter_id: Uuid,
    requested: impl FnOnce() -> Result<VoteType, AppError>,
) -> Result<VoteOutcome, AppError> {
    let mut tx = store.begin().await?;

    let mut review = tx
        .lock_review(review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {review_id} not found")))?;
    let requested = requested()?;

    let current = tx
        .vote_for(review_id, voter_id)
        .await?
        .map(|v| v.vote_type);

    let (action, state) = match plan_vote(review.gourmand_id, voter_id, current, requested) {
        VoteTransition::SelfVote => {
            warn!("User {} tried to vote on own review {}", voter_id, review_id);
            return Ok(VoteOutcome::untouched(VoteAction::Ignored, VoteState::NoVote, &review));
        }
        VoteTransition::Repeat => {
            return Ok(VoteOutcome::untouched(
                VoteAction::Unchanged,
                VoteState::from(current),
                &review,
            ));
        }
        VoteTransition::Cast(vote_type) => {
            tx.insert_vote(review_id, voter_id, vote_type).await?;
            review.add_vote(vote_type);
            (VoteAction::Cast, VoteState::from(Some(vote_type)))
        }
        VoteTransition::Switch { from, to } => {
            tx.delete_vote(review_id, voter_id).await?;
            review.retract_vote(from);
            tx.insert_vote(review_id, voter_id, to).await?;
            review.add_vote(to);
            (VoteAction::Switched, VoteState::from(Some(to)))
        }
    };

    tx.save_vote_counts(review_id, review.positive_rating, review.negative_rating)
        .await?;
    let ratings = recompute_ratings(&mut tx, review.place_id, review.gourmand_id).await?;
    tx.commit().await?;

    info!(
        "Vote {} by {} on review {} ({:?}): +{} / -{}",
        requested,
        voter_id,
        review_id,
        action,
        review.positive_rating,
        review.negative_rating
    );

    Ok(VoteOutcome {
        action,
        state,
        review_id,
        positive_rating: review.positive_rating,
        negative_rating: review.negative_rating,
        place_rating: Some(ratings.place_rating),
    })
}

/// Current vote of a user on a review.
pub async fn vote_state<S: Store>(
    store: &S,
    review_id: Uuid,
    user_id: Uuid,
) -> Result<VoteState, AppError> {
    let mut tx = store.begin().await?;
    let vote = tx.vote_for(review_id, user_id).await?;
    Ok(vote.map(|v| v.vote_type).into())
}
