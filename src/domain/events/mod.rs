//! Domain events
use crate::domain::value_objects::{ProductId, UserId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Favorite(FavoriteEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FavoriteEvent {
    Loaded { user_id: UserId, count: usize },
    Added { user_id: UserId, product_id: ProductId },
    Removed { user_id: UserId, product_id: ProductId },
}
