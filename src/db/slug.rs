use sqlx::PgConnection;

use crate::{errors::AppError, slug};

#[derive(Debug, Clone, Copy)]
pub enum SlugTable {
    Users,
    Places,
    Events,
}

impl SlugTable {
    fn exists_query(self) -> &'static str {
        match self {
            SlugTable::Users => "SELECT EXISTS(SELECT 1 FROM users WHERE slug = $1)",
            SlugTable::Places => "SELECT EXISTS(SELECT 1 FROM places WHERE slug = $1)",
            SlugTable::Events => "SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1)",
        }
    }
}

/// First free slug among `base`, `base-1`, `base-2`, …
pub async fn unique_slug(
    conn: &mut PgConnection,
    table: SlugTable,
    base: &str,
) -> Result<String, AppError> {
    let mut attempt = 0;
    loop {
        let candidate = slug::candidate(base, attempt);
        let taken = sqlx::query_scalar::<_, bool>(table.exists_query())
            .bind(&candidate)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::db("Failed to check slug", e))?;
        if !taken {
            return Ok(candidate);
        }
        attempt += 1;
    }
}
