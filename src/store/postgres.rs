use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
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

const REVIEW_COLUMNS: &str = "r.id, r.place_id, r.gourmand_id, r.name, r.description, \
     r.gourmand_rating, r.positive_rating, r.negative_rating, r.review_date, r.slug";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, AppError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::db("Failed to begin transaction", e))?;
        Ok(PgTx { tx })
    }
}

#[derive(FromRow)]
struct RatedReviewRow {
    #[sqlx(flatten)]
    review: Review,
    author_reputation: Option<f64>,
}

#[derive(FromRow)]
struct ResponseRow {
    id: Uuid,
    review_id: Uuid,
    score: i16,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ResponseTagRow {
    response_id: Uuid,
    id: i32,
    name: String,
    label: String,
}

/// Attaches tags to response rows with a single follow-up query.
async fn with_tags(
    conn: &mut PgConnection,
    rows: Vec<ResponseRow>,
) -> Result<Vec<NpsResponse>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let tag_rows = sqlx::query_as::<_, ResponseTagRow>(
        "SELECT rt.response_id, t.id, t.name, t.label
            FROM nps_response_tags rt
            JOIN nps_tags t ON t.id = rt.tag_id
            WHERE rt.response_id = ANY($1)
            ORDER BY t.id",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::db("Failed to fetch NPS tags", e))?;

    let mut tags: HashMap<Uuid, Vec<NpsTag>> = HashMap::new();
    for row in tag_rows {
        tags.entry(row.response_id).or_default().push(NpsTag {
            id: row.id,
            name: row.name,
            label: row.label,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| NpsResponse {
            tags: tags.remove(&row.id).unwrap_or_default(),
            id: row.id,
            review_id: row.review_id,
            score: row.score,
            created_at: row.created_at,
        })
        .collect())
}

/// NPS responses of the given reviews, keyed by review id.
pub(crate) async fn responses_for_reviews(
    conn: &mut PgConnection,
    review_ids: &[Uuid],
) -> Result<HashMap<Uuid, NpsResponse>, AppError> {
    if review_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, ResponseRow>(
        "SELECT id, review_id, score, created_at FROM nps_responses WHERE review_id = ANY($1)",
    )
    .bind(review_ids)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| AppError::db("Failed to fetch NPS responses", e))?;

    Ok(with_tags(conn, rows)
        .await?
        .into_iter()
        .map(|response| (response.review_id, response))
        .collect())
}

#[async_trait]
impl StoreTx for PgTx {
    async fn lock_review(&mut self, review_id: Uuid) -> Result<Option<Review>, AppError> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r WHERE r.id = $1 FOR UPDATE"
        ))
        .bind(review_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to lock review", e))
    }

    async fn find_place(&mut self, place_id: Uuid) -> Result<Option<Place>, AppError> {
        sqlx::query_as::<_, Place>("SELECT * FROM places WHERE id = $1")
            .bind(place_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to fetch place", e))
    }

    async fn places_for_owner(&mut self, owner_id: Uuid) -> Result<Vec<Place>, AppError> {
        sqlx::query_as::<_, Place>("SELECT * FROM places WHERE owner_id = $1 ORDER BY name, id")
            .bind(owner_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to fetch owner places", e))
    }

    async fn reviews_for_user(&mut self, user_id: Uuid) -> Result<Vec<Review>, AppError> {
        sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r
                WHERE r.gourmand_id = $1
                ORDER BY r.review_date, r.id"
        ))
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to fetch user reviews", e))
    }

    async fn reviews_for_place(&mut self, place_id: Uuid) -> Result<Vec<RatedReview>, AppError> {
        sqlx::query("SELECT id FROM places WHERE id = $1 FOR UPDATE")
            .bind(place_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to lock place", e))?;

        let rows = sqlx::query_as::<_, RatedReviewRow>(&format!(
            "SELECT {REVIEW_COLUMNS}, gp.rating AS author_reputation
                FROM reviews r
                LEFT JOIN gourmand_profiles gp ON gp.user_id = r.gourmand_id
                WHERE r.place_id = $1
                ORDER BY r.review_date, r.id"
        ))
        .bind(place_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to fetch place reviews", e))?;

        Ok(rows
            .into_iter()
            .map(|row| RatedReview {
                review: row.review,
                author_reputation: row.author_reputation,
            })
            .collect())
    }

    async fn recent_reviews_for_place(
        &mut self,
        place_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<ReviewWithNps>, AppError> {
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews r
                WHERE r.place_id = $1 AND r.review_date >= $2
                ORDER BY r.review_date, r.id"
        ))
        .bind(place_id)
        .bind(since)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to fetch recent reviews", e))?;

        let ids: Vec<Uuid> = reviews.iter().map(|r| r.id).collect();
        let mut by_review = responses_for_reviews(&mut *self.tx, &ids).await?;

        Ok(reviews
            .into_iter()
            .map(|review| ReviewWithNps {
                nps: by_review.remove(&review.id),
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
        let rows = sqlx::query_as::<_, ResponseRow>(
            "SELECT n.id, n.review_id, n.score, n.created_at
                FROM nps_responses n
                JOIN reviews r ON r.id = n.review_id
                WHERE r.place_id = $1
                    AND ($2::timestamptz IS NULL OR n.created_at >= $2)
                    AND ($3::timestamptz IS NULL OR n.created_at < $3)
                ORDER BY n.created_at, n.id",
        )
        .bind(place_id)
        .bind(since)
        .bind(until)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to fetch NPS responses", e))?;

        with_tags(&mut *self.tx, rows).await
    }

    async fn nps_responses_for_owner(
        &mut self,
        owner_id: Uuid,
    ) -> Result<Vec<NpsResponse>, AppError> {
        let rows = sqlx::query_as::<_, ResponseRow>(
            "SELECT n.id, n.review_id, n.score, n.created_at
                FROM nps_responses n
                JOIN reviews r ON r.id = n.review_id
                JOIN places p ON p.id = r.place_id
                WHERE p.owner_id = $1
                ORDER BY n.created_at, n.id",
        )
        .bind(owner_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to fetch owner NPS responses", e))?;

        with_tags(&mut *self.tx, rows).await
    }

    async fn vote_for(
        &mut self,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ReviewVote>, AppError> {
        sqlx::query_as::<_, ReviewVote>(
            "SELECT review_id, user_id, vote_type FROM review_votes
                WHERE review_id = $1 AND user_id = $2",
        )
        .bind(review_id)
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to fetch vote", e))
    }

    async fn insert_vote(
        &mut self,
        review_id: Uuid,
        user_id: Uuid,
        vote_type: VoteType,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO review_votes (review_id, user_id, vote_type) VALUES ($1, $2, $3)")
            .bind(review_id)
            .bind(user_id)
            .bind(vote_type)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to insert vote", e))?;
        Ok(())
    }

    async fn delete_vote(&mut self, review_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM review_votes WHERE review_id = $1 AND user_id = $2")
            .bind(review_id)
            .bind(user_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to delete vote", e))?;
        Ok(())
    }

    async fn save_vote_counts(
        &mut self,
        review_id: Uuid,
        positive: i32,
        negative: i32,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE reviews SET positive_rating = $2, negative_rating = $3 WHERE id = $1")
            .bind(review_id)
            .bind(positive)
            .bind(negative)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to update vote counts", e))?;
        Ok(())
    }

    async fn tags_by_name(&mut self, names: &[String]) -> Result<Vec<NpsTag>, AppError> {
        sqlx::query_as::<_, NpsTag>("SELECT id, name, label FROM nps_tags WHERE name = ANY($1)")
            .bind(names)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to fetch NPS tags", e))
    }

    async fn review_slug_exists(&mut self, slug: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM reviews WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to check review slug", e))
    }

    async fn insert_review(&mut self, review: &Review) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO reviews (id, place_id, gourmand_id, name, description, gourmand_rating,
                positive_rating, negative_rating, review_date, slug)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(review.id)
        .bind(review.place_id)
        .bind(review.gourmand_id)
        .bind(&review.name)
        .bind(&review.description)
        .bind(review.gourmand_rating)
        .bind(review.positive_rating)
        .bind(review.negative_rating)
        .bind(review.review_date)
        .bind(&review.slug)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to insert review", e))?;
        Ok(())
    }

    async fn insert_nps_response(&mut self, response: &NpsResponse) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO nps_responses (id, review_id, score, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(response.id)
        .bind(response.review_id)
        .bind(response.score)
        .bind(response.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to insert NPS response", e))?;

        let tag_ids: Vec<i32> = response.tags.iter().map(|t| t.id).collect();
        sqlx::query(
            "INSERT INTO nps_response_tags (response_id, tag_id)
                SELECT $1, UNNEST($2::int4[])",
        )
        .bind(response.id)
        .bind(&tag_ids)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::db("Failed to tag NPS response", e))?;
        Ok(())
    }

    async fn save_rating(&mut self, entity: RatedEntity, value: f64) -> Result<(), AppError> {
        let (sql, id) = match entity {
            RatedEntity::Place(id) => ("UPDATE places SET rating = $2 WHERE id = $1", id),
            RatedEntity::Gourmand(id) => {
                ("UPDATE gourmand_profiles SET rating = $2 WHERE user_id = $1", id)
            }
        };
        sqlx::query(sql)
            .bind(id)
            .bind(value)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::db("Failed to save rating", e))?;
        Ok(())
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx
            .commit()
            .await
            .map_err(|e| AppError::db("Failed to commit transaction", e))
    }
}
