pub mod get;

pub use get::{GourmandSort, list_gourmands};
