use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{errors::AppError, models::nps::NpsResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "vote_type", rename_all = "lowercase")]
pub enum VoteType {
    Positive,
    Negative,
}

impl VoteType {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteType::Positive => "positive",
            VoteType::Negative => "negative",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(VoteType::Positive),
            "negative" => Ok(VoteType::Negative),
            other => Err(AppError::BadRequest(format!("Invalid vote type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub place_id: Uuid,
    pub gourmand_id: Uuid,
    pub name: String,
    pub description: String,
    pub gourmand_rating: Option<i16>,
    pub positive_rating: i32,
    pub negative_rating: i32,
    pub review_date: DateTime<Utc>,
    pub slug: String,
}

impl Review {
    pub fn tally(&self) -> VoteTally {
        VoteTally {
            positive: self.positive_rating,
            negative: self.negative_rating,
        }
    }

    pub fn add_vote(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Positive => self.positive_rating += 1,
            VoteType::Negative => self.negative_rating += 1,
        }
    }

    /// Counters never drop below zero.
    pub fn retract_vote(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Positive => self.positive_rating = (self.positive_rating - 1).max(0),
            VoteType::Negative => self.negative_rating = (self.negative_rating - 1).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub positive: i32,
    pub negative: i32,
}

/// A review paired with the stored reputation of its author, `None` when the
/// author has no gourmand profile.
#[derive(Debug, Clone)]
pub struct RatedReview {
    pub review: Review,
    pub author_reputation: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithNps {
    #[serde(flatten)]
    pub review: Review,
    pub nps: Option<NpsResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewVote {
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub vote_type: VoteType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub place_id: Uuid,
    pub name: String,
    pub description: String,
    pub gourmand_rating: Option<i16>,
    pub nps_score: i16,
    #[serde(default)]
    pub nps_tags: Vec<String>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Review name is required".into()));
        }
        if self.name.chars().count() > 50 {
            return Err(AppError::BadRequest(
                "Review name must be at most 50 characters".into(),
            ));
        }
        if let Some(rating) = self.gourmand_rating {
            if !(1..=5).contains(&rating) {
                return Err(AppError::BadRequest(
                    "Rating must be between 1 and 5".into(),
                ));
            }
        }
        if !(1..=10).contains(&self.nps_score) {
            return Err(AppError::BadRequest(
                "NPS score must be between 1 and 10".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSort {
    #[default]
    Id,
    Date,
    Name,
}

impl ReviewSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("date") => ReviewSort::Date,
            Some("name") => ReviewSort::Name,
            _ => ReviewSort::Id,
        }
    }

    pub fn order_by(self) -> &'static str {
        match self {
            ReviewSort::Id => "id",
            ReviewSort::Date => "review_date DESC, id",
            ReviewSort::Name => "name, id",
        }
    }
}
