pub mod get;
pub mod post;
pub mod put;

pub use get::{get_place_by_slug, list_places};
pub use post::create_place;
pub use put::update_place;
