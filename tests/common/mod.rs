#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use gourmand_be::{
    models::{
        Place, Review,
        nps::{NpsResponse, NpsTag},
        review::RatedReview,
    },
    store::MemoryData,
};
use uuid::Uuid;

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn place(owner_id: Option<Uuid>) -> Place {
    let id = Uuid::new_v4();
    Place {
        id,
        name: "Blue Door".into(),
        description: "Small bistro".into(),
        place_email: "hello@bluedoor.test".into(),
        location: "Main street 1".into(),
        phone: "+100000".into(),
        website: None,
        rating: 0.0,
        owner_id,
        slug: format!("blue-door-{}", &id.simple().to_string()[..8]),
    }
}

pub fn review(place_id: Uuid, author_id: Uuid, rating: Option<i16>, pos: i32, neg: i32) -> Review {
    let id = Uuid::new_v4();
    Review {
        id,
        place_id,
        gourmand_id: author_id,
        name: "Dinner".into(),
        description: "Good food".into(),
        gourmand_rating: rating,
        positive_rating: pos,
        negative_rating: neg,
        review_date: at(2024, 3, 10),
        slug: format!("dinner-{}", &id.simple().to_string()[..8]),
    }
}

pub fn rated(rating: Option<i16>, pos: i32, neg: i32, reputation: Option<f64>) -> RatedReview {
    RatedReview {
        review: review(Uuid::new_v4(), Uuid::new_v4(), rating, pos, neg),
        author_reputation: reputation,
    }
}

pub fn tag(id: i32, name: &str) -> NpsTag {
    NpsTag {
        id,
        name: name.into(),
        label: name.into(),
    }
}

pub fn default_tags() -> Vec<NpsTag> {
    ["kitchen", "service", "atmosphere", "price"]
        .iter()
        .enumerate()
        .map(|(i, name)| tag(i as i32 + 1, name))
        .collect()
}

pub fn response(review_id: Uuid, score: i16, created_at: DateTime<Utc>, tags: &[&str]) -> NpsResponse {
    NpsResponse {
        id: Uuid::new_v4(),
        review_id,
        score,
        created_at,
        tags: tags
            .iter()
            .enumerate()
            .map(|(i, name)| tag(i as i32 + 1, name))
            .collect(),
    }
}

/// A place with one review written by `author`, plus a second gourmand who
/// can vote on it. Both gourmands have profiles.
pub struct VotingFixture {
    pub data: MemoryData,
    pub place_id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
    pub voter_id: Uuid,
}

pub fn voting_fixture() -> VotingFixture {
    let author_id = Uuid::new_v4();
    let voter_id = Uuid::new_v4();
    let place = place(None);
    let review = review(place.id, author_id, Some(4), 0, 0);

    let mut data = MemoryData {
        tags: default_tags(),
        ..Default::default()
    };
    data.profiles.insert(author_id, 3.0);
    data.profiles.insert(voter_id, 0.0);
    let fixture = VotingFixture {
        place_id: place.id,
        review_id: review.id,
        author_id,
        voter_id,
        data: MemoryData::default(),
    };
    data.places.insert(place.id, place);
    data.reviews.insert(review.id, review);

    VotingFixture { data, ..fixture }
}
