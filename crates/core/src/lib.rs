pub mod error;
pub mod model;

pub use error::CoreError;
pub use model::{Category, CategoryPlacement, Site};
