pub mod error;
pub mod filters;
pub mod health;
pub mod items;

pub use error::AppError;
