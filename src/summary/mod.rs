//! LLM-written digests of recent reviews for place owners.
//!
//! Summaries are cached per place and period for a day. Nothing here can
//! fail the caller: any error degrades to a readable fallback text.

pub mod cache;
pub mod openai;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    engine::nps::ReportPeriod,
    errors::AppError,
    models::{Place, redis::RedisKey, review::ReviewWithNps},
};

pub use cache::RedisSummaryCache;
pub use openai::OpenAiSummarizer;

pub const SUMMARY_TTL: Duration = Duration::from_secs(60 * 60 * 24);
pub const NO_REVIEWS_TEXT: &str = "No reviews for the selected period.";
pub const SUMMARY_FAILED_TEXT: &str = "Could not analyse reviews right now, please try again later.";

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, place_name: &str, reviews_text: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait SummaryCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError>;
}

/// Renders reviews as the plain-text block handed to the summarizer, or
/// `None` when there is nothing to summarize.
pub fn prepare_reviews_text(reviews: &[ReviewWithNps]) -> Option<String> {
    if reviews.is_empty() {
        return None;
    }

    let blocks: Vec<String> = reviews
        .iter()
        .map(|r| {
            let score = r
                .nps
                .as_ref()
                .map_or_else(|| "not specified".to_string(), |n| n.score.to_string());
            let tags = r
                .nps
                .as_ref()
                .filter(|n| !n.tags.is_empty())
                .map_or_else(
                    || "no tags".to_string(),
                    |n| {
                        n.tags
                            .iter()
                            .map(|t| t.label.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    },
                );
            format!(
                "Review: {}\nNPS score: {}\nTags: {}\nPositive votes: {}, Negative votes: {}\n",
                r.review.description, score, tags, r.review.positive_rating, r.review.negative_rating
            )
        })
        .collect();

    Some(blocks.join("\n---\n"))
}

#[derive(Clone)]
pub struct ReviewSummaries {
    summarizer: Arc<dyn Summarizer>,
    cache: Arc<dyn SummaryCache>,
    timeout: Duration,
}

impl ReviewSummaries {
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        cache: Arc<dyn SummaryCache>,
        timeout: Duration,
    ) -> Self {
        Self {
            summarizer,
            cache,
            timeout,
        }
    }

    /// Cached summary of `reviews` for `place` over `period`. Failures are
    /// not cached so the next request retries.
    pub async fn summary_for(
        &self,
        place: &Place,
        period: ReportPeriod,
        reviews: &[ReviewWithNps],
    ) -> String {
        let key = RedisKey::review_summary(place.id, period.as_str());

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!("Summary cache hit for {}", key);
                return cached;
            }
            Ok(None) => debug!("Summary cache miss for {}", key),
            Err(e) => warn!("Summary cache read failed for {}: {}", key, e),
        }

        let summary = match prepare_reviews_text(reviews) {
            None => NO_REVIEWS_TEXT.to_string(),
            Some(text) => {
                match tokio::time::timeout(self.timeout, self.summarizer.summarize(&place.name, &text))
                    .await
                {
                    Ok(Ok(summary)) => summary,
                    Ok(Err(e)) => {
                        warn!("Summarizer failed for place {}: {}", place.id, e);
                        return SUMMARY_FAILED_TEXT.to_string();
                    }
                    Err(_) => {
                        warn!(
                            "Summarizer timed out after {:?} for place {}",
                            self.timeout, place.id
                        );
                        return SUMMARY_FAILED_TEXT.to_string();
                    }
                }
            }
        };

        if let Err(e) = self.cache.set(&key, &summary, SUMMARY_TTL).await {
            warn!("Summary cache write failed for {}: {}", key, e);
        }
        summary
    }
}
