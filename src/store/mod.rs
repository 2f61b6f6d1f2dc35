//! Data-access contract consumed by the rating, NPS and voting code.
//!
//! Every operation runs inside a [`StoreTx`]. Dropping a transaction without
//! calling [`StoreTx::commit`] discards its writes.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        Place, Review,
        nps::{NpsResponse, NpsTag},
        review::{RatedReview, ReviewVote, ReviewWithNps, VoteType},
    },
};

pub use memory::{MemoryData, MemoryStore};
pub use postgres::PgStore;

/// Target of a derived rating write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatedEntity {
    Place(Uuid),
    Gourmand(Uuid),
}

#[async_trait]
pub trait Store: Send + Sync {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, AppError>;
}

#[async_trait]
pub trait StoreTx: Send {
    /// Loads a review and holds it exclusively until the transaction ends.
    async fn lock_review(&mut self, review_id: Uuid) -> Result<Option<Review>, AppError>;

    async fn find_place(&mut self, place_id: Uuid) -> Result<Option<Place>, AppError>;

    async fn places_for_owner(&mut self, owner_id: Uuid) -> Result<Vec<Place>, AppError>;

    async fn reviews_for_user(&mut self, user_id: Uuid) -> Result<Vec<Review>, AppError>;

    /// Reviews of a place joined with their author's stored reputation. The
    /// place is held exclusively until the transaction ends.
    async fn reviews_for_place(&mut self, place_id: Uuid) -> Result<Vec<RatedReview>, AppError>;

    /// Reviews written at or after `since`, each with its NPS answer.
    async fn recent_reviews_for_place(
        &mut self,
        place_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<ReviewWithNps>, AppError>;

    /// `since` is inclusive, `until` exclusive.
    async fn nps_responses_for_place(
        &mut self,
        place_id: Uuid,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<NpsResponse>, AppError>;

    async fn nps_responses_for_owner(&mut self, owner_id: Uuid)
    -> Result<Vec<NpsResponse>, AppError>;

    async fn vote_for(
        &mut self,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReviewVote>, AppError>;

    async fn insert_vote(
        &mut self,
        review_id: Uuid,
        user_id: Uuid,
        vote_type: VoteType,
    ) -> Result<(), AppError>;

    async fn delete_vote(&mut self, review_id: Uuid, user_id: Uuid) -> Result<(), AppError>;

    async fn save_vote_counts(
        &mut self,
        review_id: Uuid,
        positive: i32,
        negative: i32,
    ) -> Result<(), AppError>;

    async fn tags_by_name(&mut self, names: &[String]) -> Result<Vec<NpsTag>, AppError>;

    async fn review_slug_exists(&mut self, slug: &str) -> Result<bool, AppError>;

    async fn insert_review(&mut self, review: &Review) -> Result<(), AppError>;

    async fn insert_nps_response(&mut self, response: &NpsResponse) -> Result<(), AppError>;

    /// Writes a derived rating without triggering any further recomputation.
    /// A gourmand without a profile is left untouched.
    async fn save_rating(&mut self, entity: RatedEntity, value: f64) -> Result<(), AppError>;

    async fn commit(self) -> Result<(), AppError>;
}
