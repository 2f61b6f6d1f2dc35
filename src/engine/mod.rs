pub mod dashboard;
pub mod nps;
pub mod rating;
pub mod reviews;
pub mod voting;

pub use rating::{gourmand_rating, place_rating, quantize};
pub use voting::{VoteOutcome, cast_named_vote, cast_vote};
