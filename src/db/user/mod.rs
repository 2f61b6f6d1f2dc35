pub mod get;
pub mod patch;
pub mod post;

pub use get::{get_user_by_id, get_user_by_slug};
pub use post::create_user;
