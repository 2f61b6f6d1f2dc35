pub mod event;
pub mod gourmand;
pub mod nps;
pub mod place;
pub mod review;
pub mod slug;
pub mod user;
