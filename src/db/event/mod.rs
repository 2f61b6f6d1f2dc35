pub mod get;
pub mod post;

pub use get::{get_event_by_slug, list_events};
pub use post::create_event;
