use std::sync::Arc;

use bb8::Pool;
use bb8_redis::RedisConnectionManager;

use crate::{config::Config, store::PgStore, summary::ReviewSummaries};

#[derive(Clone)]
pub struct AppState {
    pub store: PgStore,
    pub summaries: ReviewSummaries,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn postgres(&self) -> &sqlx::PgPool {
        self.store.pool()
    }
}

pub type RedisClient = Pool<RedisConnectionManager>;
