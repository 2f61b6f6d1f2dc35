pub mod get;

pub use get::{
    ReviewFilter, get_review_by_slug, get_review_id_by_slug, get_reviews_by_author, list_reviews,
};
