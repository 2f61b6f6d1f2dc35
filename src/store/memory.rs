use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        Place, Review,
        nps::{NpsResponse, NpsTag},
        review::{RatedReview, ReviewVote, ReviewWithNps, VoteType},
    },
    store::{RatedEntity, Store, StoreTx},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryData {
    pub places: HashMap<Uuid, Place>,
    pub reviews: HashMap<Uuid, Review>,
    /// Gourmand profile ratings keyed by user id.
    pub profiles: HashMap<Uuid, f64>,
    pub votes: HashMap<(Uuid, Uuid), VoteType>,
    /// NPS responses keyed by review id.
    pub nps: HashMap<Uuid, NpsResponse>,
    pub tags: Vec<NpsTag>,
}

impl MemoryData {
    fn reviews_where(&self, pred: impl Fn(&Review) -> bool) -> Vec<Review> {
        let mut reviews: Vec<Review> = self.reviews.values().filter(|r| pred(r)).cloned().collect();
        reviews.sort_by(|a, b| a.review_date.cmp(&b.review_date).then(a.id.cmp(&b.id)));
        reviews
    }

    fn responses_where(&self, pred: impl Fn(&NpsResponse) -> bool) -> Vec<NpsResponse> {
        let mut responses: Vec<NpsResponse> =
            self.nps.values().filter(|n| pred(n)).cloned().collect();
        responses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        responses
    }

    fn place_of_review(&self, review_id: Uuid) -> Option<Uuid> {
        self.reviews.get(&review_id).map(|r| r.place_id)
    }
}

/// Store kept in process memory. A transaction holds the whole store until it
/// is committed or dropped, so transactions never interleave.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new(data: MemoryData) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn snapshot(&self) -> MemoryData {
        self.data.lock().await.clone()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryData>,
    work: MemoryData,
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, AppError> {
        let guard = self.data.clone().lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTx { guard, work })
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_review(&mut self, review_id: Uuid) -> Result<Option<Review>, AppError> {
        Ok(self.work.reviews.get(&review_id).cloned())
    }

    async fn find_place(&mut self, place_id: Uuid) -> Result<Option<Place>, AppError> {
        Ok(self.work.places.get(&place_id).cloned())
    }

    async fn places_for_owner(&mut self, owner_id: Uuid) -> Result<Vec<Place>, AppError> {
        let mut places: Vec<Place> = self
            .work
            .places
            .values()
            .filter(|p| p.owner_id == Some(owner_id))
            .cloned()
            .collect();
        places.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(places)
    }

    async fn reviews_for_user(&mut self, user_id: Uuid) -> Result<Vec<Review>, AppError> {
        Ok(self.work.reviews_where(|r| r.gourmand_id == user_id))
    }

    async fn reviews_for_place(&mut self, place_id: Uuid) -> Result<Vec<RatedReview>, AppError> {
        Ok(self
            .work
            .reviews_where(|r| r.place_id == place_id)
            .into_iter()
            .map(|review| RatedReview {
                author_reputation: self.work.profiles.get(&review.gourmand_id).copied(),
                review,
            })
            .collect())
    }

    async fn recent_reviews_for_place(
        &mut self,
        place_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<ReviewWithNps>, AppError> {
        Ok(self
            .work
            .reviews_where(|r| r.place_id == place_id && r.review_date >= since)
            .into_iter()
            .map(|review| ReviewWithNps {
                nps: self.work.nps.get(&review.id).cloned(),
                review,
            })
            .collect())
    }

    async fn nps_responses_for_place(
        &mut self,
        place_id: Uuid,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<NpsResponse>, AppError> {
        let data = &self.work;
        Ok(data.responses_where(|n| {
            data.place_of_review(n.review_id) == Some(place_id)
                && since.is_none_or(|s| n.created_at >= s)
                && until.is_none_or(|u| n.created_at < u)
        }))
    }

    async fn nps_responses_for_owner(
        &mut self,
        owner_id: Uuid,
    ) -> Result<Vec<NpsResponse>, AppError> {
        let data = &self.work;
        Ok(data.responses_where(|n| {
            data.place_of_review(n.review_id)
                .and_then(|place_id| data.places.get(&place_id))
                .is_some_and(|p| p.owner_id == Some(owner_id))
        }))
    }

    async fn vote_for(
        &mut self,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReviewVote>, AppError> {
        Ok(self
            .work
            .votes
            .get(&(review_id, user_id))
            .map(|&vote_type| ReviewVote {
                review_id,
                user_id,
                vote_type,
            }))
    }

    async fn insert_vote(
        &mut self,
        review_id: Uuid,
        user_id: Uuid,
        vote_type: VoteType,
    ) -> Result<(), AppError> {
        if self.work.votes.contains_key(&(review_id, user_id)) {
            return Err(AppError::DatabaseError(format!(
                "Vote for review {review_id} by {user_id} already exists"
            )));
        }
        self.work.votes.insert((review_id, user_id), vote_type);
        Ok(())
    }

    async fn delete_vote(&mut self, review_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        self.work.votes.remove(&(review_id, user_id));
        Ok(())
    }

    async fn save_vote_counts(
        &mut self,
        review_id: Uuid,
        positive: i32,
        negative: i32,
    ) -> Result<(), AppError> {
        let review = self
            .work
            .reviews
            .get_mut(&review_id)
            .ok_or_else(|| AppError::NotFound(format!("Review {review_id} not found")))?;
        review.positive_rating = positive;
        review.negative_rating = negative;
        Ok(())
    }

    async fn tags_by_name(&mut self, names: &[String]) -> Result<Vec<NpsTag>, AppError> {
        Ok(self
            .work
            .tags
            .iter()
            .filter(|t| names.contains(&t.name))
            .cloned()
            .collect())
    }

    async fn review_slug_exists(&mut self, slug: &str) -> Result<bool, AppError> {
        Ok(self.work.reviews.values().any(|r| r.slug == slug))
    }

    async fn insert_review(&mut self, review: &Review) -> Result<(), AppError> {
        self.work.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn insert_nps_response(&mut self, response: &NpsResponse) -> Result<(), AppError> {
        if self.work.nps.contains_key(&response.review_id) {
            return Err(AppError::DatabaseError(format!(
                "Review {} already has an NPS response",
                response.review_id
            )));
        }
        self.work.nps.insert(response.review_id, response.clone());
        Ok(())
    }

    async fn save_rating(&mut self, entity: RatedEntity, value: f64) -> Result<(), AppError> {
        match entity {
            RatedEntity::Place(id) => {
                if let Some(place) = self.work.places.get_mut(&id) {
                    place.rating = value;
                }
            }
            RatedEntity::Gourmand(id) => {
                if let Some(rating) = self.work.profiles.get_mut(&id) {
                    *rating = value;
                }
            }
        }
        Ok(())
    }

    async fn commit(mut self) -> Result<(), AppError> {
        *self.guard = self.work;
        Ok(())
    }
}
