use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        Review,
        page::{Page, PageWindow},
        review::{ReviewSort, ReviewWithNps},
    },
    store::postgres::responses_for_reviews,
};

/// Which reviews a listing covers.
#[derive(Debug, Clone, Copy, Default)]
pub enum ReviewFilter<'a> {
    #[default]
    All,
    PlaceSlug(&'a str),
    AuthorSlug(&'a str),
}

impl<'a> ReviewFilter<'a> {
    fn clause(self) -> &'static str {
        match self {
            ReviewFilter::All => "($1::text IS NULL)",
            ReviewFilter::PlaceSlug(_) => "place_id = (SELECT id FROM places WHERE slug = $1)",
            ReviewFilter::AuthorSlug(_) => "gourmand_id = (SELECT id FROM users WHERE slug = $1)",
        }
    }

    fn slug(self) -> Option<&'a str> {
        match self {
            ReviewFilter::All => None,
            ReviewFilter::PlaceSlug(slug) | ReviewFilter::AuthorSlug(slug) => Some(slug),
        }
    }
}

pub async fn list_reviews(
    filter: ReviewFilter<'_>,
    sort: ReviewSort,
    page: Option<&str>,
    postgres: &PgPool,
) -> Result<Page<Review>, AppError> {
    let total = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM reviews WHERE {}",
        filter.clause()
    ))
    .bind(filter.slug())
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::db("Failed to count reviews", e))?;

    let window = PageWindow::resolve(page, total);

    let items = sqlx::query_as::<_, Review>(&format!(
        "SELECT * FROM reviews WHERE {} ORDER BY {} LIMIT $2 OFFSET $3",
        filter.clause(),
        sort.order_by()
    ))
    .bind(filter.slug())
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::db("Failed to list reviews", e))?;

    Ok(window.wrap(items, total))
}

/// Every review written by a gourmand, oldest first.
pub async fn get_reviews_by_author(
    author_id: Uuid,
    postgres: &PgPool,
) -> Result<Vec<Review>, AppError> {
    sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE gourmand_id = $1 ORDER BY review_date, id",
    )
    .bind(author_id)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::db("Failed to fetch user reviews", e))
}

pub async fn get_review_by_slug(slug: &str, postgres: &PgPool) -> Result<ReviewWithNps, AppError> {
    let review = sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE slug = $1")
        .bind(slug)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch review", e))?
        .ok_or_else(|| AppError::NotFound(format!("Review '{}' not found", slug)))?;

    let mut conn = postgres
        .acquire()
        .await
        .map_err(|e| AppError::db("Failed to acquire connection", e))?;
    let mut nps = responses_for_reviews(&mut *conn, &[review.id]).await?;

    Ok(ReviewWithNps {
        nps: nps.remove(&review.id),
        review,
    })
}

pub async fn get_review_id_by_slug(slug: &str, postgres: &PgPool) -> Result<Uuid, AppError> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM reviews WHERE slug = $1")
        .bind(slug)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::db("Failed to fetch review", e))?
        .ok_or_else(|| AppError::NotFound(format!("Review '{}' not found", slug)))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    async fn insert_user(pool: &PgPool, slug: &str) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query("INSERT INTO users (id, email, password_hash, slug) VALUES ($1, $2, 'x', $3)")
            .bind(id)
            .bind(format!("{slug}@gourmand.test"))
            .bind(slug)
            .execute(pool)
            .await
            .unwrap();
        id
    }

    async fn insert_review(pool: &PgPool, place_id: Uuid, author_id: Uuid, day: u32) -> Uuid {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO reviews (id, place_id, gourmand_id, name, description, review_date, slug)
                VALUES ($1, $2, $3, 'Dinner', 'Good food', $4, $5)",
        )
        .bind(id)
        .bind(place_id)
        .bind(author_id)
        .bind(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap())
        .bind(format!("dinner-{}", id.simple()))
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn test_reviews_by_author_oldest_first(pool: PgPool) {
        let author = insert_user(&pool, "anna").await;
        let other = insert_user(&pool, "boris").await;
        let place_id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO places (id, name, description, place_email, location, phone, slug)
                VALUES ($1, 'Blue Door', 'Bistro', 'hi@bluedoor.test', 'Main street 1', '+1', 'blue-door')",
        )
        .bind(place_id)
        .execute(&pool)
        .await
        .unwrap();

        let late = insert_review(&pool, place_id, author, 20).await;
        let early = insert_review(&pool, place_id, author, 2).await;
        insert_review(&pool, place_id, other, 10).await;

        let reviews = get_reviews_by_author(author, &pool).await.unwrap();
        let ids: Vec<Uuid> = reviews.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![early, late]);

        assert!(get_reviews_by_author(Uuid::now_v7(), &pool).await.unwrap().is_empty());
    }
}
