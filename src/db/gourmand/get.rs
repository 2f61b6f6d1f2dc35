use sqlx::PgPool;

use crate::{
    errors::AppError,
    models::{
        page::{Page, PageWindow},
        user::GourmandSummary,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GourmandSort {
    #[default]
    Id,
    Rating,
    Experience,
    Reviews,
}

impl GourmandSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("rating") => GourmandSort::Rating,
            Some("experience") => GourmandSort::Experience,
            Some("reviews") => GourmandSort::Reviews,
            _ => GourmandSort::Id,
        }
    }

    fn order_by(self) -> &'static str {
        match self {
            GourmandSort::Id => "u.id",
            GourmandSort::Rating => "gp.rating DESC, u.id",
            GourmandSort::Experience => "u.date_joined, u.id",
            GourmandSort::Reviews => "review_count DESC, u.id",
        }
    }
}

pub async fn list_gourmands(
    sort: GourmandSort,
    page: Option<&str>,
    postgres: &PgPool,
) -> Result<Page<GourmandSummary>, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM gourmand_profiles gp JOIN users u ON u.id = gp.user_id
            WHERE u.role = 'gourmand'",
    )
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::db("Failed to count gourmands", e))?;

    let window = PageWindow::resolve(page, total);

    let items = sqlx::query_as::<_, GourmandSummary>(&format!(
        "SELECT u.id AS user_id, u.first_name, u.last_name, u.slug, gp.description, gp.rating,
                u.date_joined,
                (SELECT COUNT(*) FROM reviews r WHERE r.gourmand_id = u.id) AS review_count
            FROM gourmand_profiles gp
            JOIN users u ON u.id = gp.user_id
            WHERE u.role = 'gourmand'
            ORDER BY {}
            LIMIT $1 OFFSET $2",
        sort.order_by()
    ))
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::db("Failed to list gourmands", e))?;

    Ok(window.wrap(items, total))
}
