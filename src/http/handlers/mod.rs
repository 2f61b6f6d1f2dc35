pub mod auth;
pub mod event;
pub mod gourmand;
pub mod nps;
pub mod place;
pub mod profile;
pub mod review;

use serde::Deserialize;

/// Query string shared by the paginated listings. Values are kept raw so a
/// malformed `sort` or `page` falls back to its default instead of failing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub place: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

pub use auth::{signin_handler, signup_handler};
pub use event::{create_event_handler, get_event_handler, list_events_handler};
pub use gourmand::{get_gourmand_handler, get_gourmand_reviews_handler, list_gourmands_handler};
pub use nps::list_tags_handler;
pub use place::{
    create_place_handler, get_place_analytics_handler, get_place_handler,
    get_place_reviews_handler, list_places_handler, update_place_handler,
};
pub use profile::{get_profile_handler, update_profile_handler};
pub use review::{
    create_review_handler, get_review_handler, get_vote_handler, list_reviews_handler,
    vote_handler,
};
