use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::{errors::AppError, state::RedisClient, summary::SummaryCache};

#[derive(Clone)]
pub struct RedisSummaryCache {
    redis: RedisClient,
}

impl RedisSummaryCache {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    async fn conn(
        &self,
    ) -> Result<bb8::PooledConnection<'_, bb8_redis::RedisConnectionManager>, AppError> {
        self.redis.get().await.map_err(|e| match e {
            bb8::RunError::User(err) => AppError::RedisCommandError(err),
            bb8::RunError::TimedOut => AppError::RedisPoolError("Redis connection timed out".into()),
        })
    }
}

#[async_trait]
impl SummaryCache for RedisSummaryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(AppError::RedisCommandError)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError> {
        let mut conn = self.conn().await?;
        let _: () = conn
            .set_ex(key, value, ttl.as_secs())
            .await
            .map_err(AppError::RedisCommandError)?;
        Ok(())
    }
}
