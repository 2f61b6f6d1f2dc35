use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub place_email: String,
    pub location: String,
    pub phone: String,
    pub website: Option<String>,
    pub rating: f64,
    pub owner_id: Option<Uuid>,
    pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePayload {
    pub name: String,
    pub description: String,
    pub place_email: String,
    pub location: String,
    pub phone: String,
    pub website: Option<String>,
}

impl PlacePayload {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Place name is required".into());
        }
        if self.name.chars().count() > 100 {
            return Err("Place name must be at most 100 characters".into());
        }
        if !self.place_email.contains('@') {
            return Err("Place email is invalid".into());
        }
        if self.phone.chars().count() > 50 {
            return Err("Phone must be at most 50 characters".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceSort {
    #[default]
    Id,
    Name,
    Rating,
}

impl PlaceSort {
    /// Unknown values fall back to id order.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("name") => PlaceSort::Name,
            Some("rating") => PlaceSort::Rating,
            _ => PlaceSort::Id,
        }
    }

    pub fn order_by(self) -> &'static str {
        match self {
            // Ids are UUID v7, so this is creation order.
            PlaceSort::Id => "id",
            PlaceSort::Name => "name, id",
            PlaceSort::Rating => "rating DESC, id",
        }
    }
}
