pub mod event;
pub mod nps;
pub mod page;
pub mod place;
pub mod redis;
pub mod review;
pub mod user;

pub use place::Place;
pub use review::Review;
pub use user::User;
