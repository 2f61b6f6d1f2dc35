use uuid::Uuid;

pub struct RedisKey;

impl RedisKey {
    pub fn review_summary(place_id: Uuid, period: &str) -> String {
        format!("review_summary_{place_id}_{period}")
    }
}
