use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NpsTag {
    pub id: i32,
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsResponse {
    pub id: Uuid,
    pub review_id: Uuid,
    pub score: i16,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<NpsTag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NpsClass {
    Promoter,
    Passive,
    Detractor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NpsStats {
    pub promoters: u64,
    pub detractors: u64,
    pub total: u64,
    pub nps: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagDynamics {
    pub current: u64,
    pub last: u64,
    pub change: i64,
}

/// Owner-facing NPS breakdown for a single place.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceAnalytics {
    pub place_id: Uuid,
    pub nps: f64,
    pub total_responses: u64,
    pub current_nps: Option<f64>,
    pub last_nps: Option<f64>,
    pub tag_stats: Vec<TagCount>,
    pub tag_dynamics: BTreeMap<String, TagDynamics>,
    pub current_month: String,
    pub last_month: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDashboard {
    pub place: crate::models::place::Place,
    #[serde(flatten)]
    pub analytics: PlaceAnalytics,
    pub summary: String,
    pub period_tag_stats: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboard {
    pub places: Vec<PlaceDashboard>,
    pub average_nps: f64,
    pub period: String,
    pub current_month: String,
    pub last_month: String,
}
