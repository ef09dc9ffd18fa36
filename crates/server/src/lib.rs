pub mod api;
pub mod seed;
pub mod title;

pub use api::{AppState, router};
