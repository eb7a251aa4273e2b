//! Aggregates module
pub mod favorites;

pub use favorites::FavoriteSet;
