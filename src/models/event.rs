use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub event_date: Option<DateTime<Utc>>,
    pub place_id: Uuid,
    pub owner_id: Option<Uuid>,
    pub is_weekly: bool,
    pub day_of_week: Option<i16>,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub name: String,
    pub description: String,
    pub event_date: Option<DateTime<Utc>>,
    pub place_id: Uuid,
    #[serde(default)]
    pub is_weekly: bool,
    pub day_of_week: Option<i16>,
}

impl EventPayload {
    /// A weekly event is pinned to a weekday (0 = Monday) and has no date;
    /// a one-off event has a date and no weekday.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Event name is required".into());
        }
        if let Some(day) = self.day_of_week {
            if !(0..=6).contains(&day) {
                return Err("Day of week must be between 0 and 6".into());
            }
        }
        match (self.is_weekly, self.day_of_week, self.event_date) {
            (true, None, _) => Err("A weekly event needs a day of week".into()),
            (true, _, Some(_)) => Err("A weekly event cannot have a date".into()),
            (false, Some(_), _) => Err("Only weekly events have a day of week".into()),
            (false, _, None) => Err("A one-off event needs a date".into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventSort {
    #[default]
    Id,
    Date,
    Name,
}

impl EventSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("date") => EventSort::Date,
            Some("name") => EventSort::Name,
            _ => EventSort::Id,
        }
    }

    pub fn order_by(self) -> &'static str {
        match self {
            EventSort::Id => "e.id",
            EventSort::Date => "e.event_date NULLS LAST, e.id",
            EventSort::Name => "e.name, e.id",
        }
    }
}
