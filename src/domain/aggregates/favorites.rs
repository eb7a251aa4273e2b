//! Favorites Aggregate

use chrono::{DateTime, Utc};
use crate::domain::events::{DomainEvent, FavoriteEvent};
use crate::domain::value_objects::{ProductId, UserId};

/// One visitor's favorite products, in the order they were added.
#[derive(Clone, Debug)]
pub struct FavoriteSet {
    user_id: UserId,
    items: Vec<ProductId>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl FavoriteSet {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id, items: vec![], updated_at: Utc::now(), events: vec![] }
    }

    pub fn user_id(&self) -> &UserId { &self.user_id }
    pub fn items(&self) -> &[ProductId] { &self.items }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn contains(&self, product_id: &ProductId) -> bool { self.items.contains(product_id) }

    /// Replaces local membership with the server's list, dropping duplicates.
    pub fn replace(&mut self, ids: Vec<ProductId>) {
        self.items.clear();
        for id in ids {
            if !self.items.contains(&id) { self.items.push(id); }
        }
        self.touch();
        self.raise_event(DomainEvent::Favorite(FavoriteEvent::Loaded { user_id: self.user_id.clone(), count: self.items.len() }));
    }

    /// Returns false when the product was already a favorite.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(&product_id) { return false; }
        self.items.push(product_id.clone());
        self.touch();
        self.raise_event(DomainEvent::Favorite(FavoriteEvent::Added { user_id: self.user_id.clone(), product_id }));
        true
    }

    /// Returns false when the product was not a favorite.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i != product_id);
        if self.items.len() == before { return false; }
        self.touch();
        self.raise_event(DomainEvent::Favorite(FavoriteEvent::Removed { user_id: self.user_id.clone(), product_id: product_id.clone() }));
        true
    }

    pub fn clear(&mut self) { self.items.clear(); self.touch(); }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ProductId { ProductId::new(s).unwrap() }

    #[test]
    fn test_favorite_operations() {
        let mut set = FavoriteSet::new(UserId::new("user_x_1").unwrap());
        assert!(set.add(pid("P1")));
        assert!(!set.add(pid("P1"))); // no duplicates
        assert!(set.add(pid("P2")));
        assert_eq!(set.items(), &[pid("P1"), pid("P2")]);
        assert!(set.remove(&pid("P1")));
        assert!(!set.remove(&pid("P1")));
        assert_eq!(set.len(), 1);
        let events = set.take_events();
        assert_eq!(events.len(), 3);
        assert!(set.take_events().is_empty());
    }

    #[test]
    fn test_replace_dedups() {
        let mut set = FavoriteSet::new(UserId::new("user_x_1").unwrap());
        set.replace(vec![pid("A"), pid("B"), pid("A")]);
        assert_eq!(set.items(), &[pid("A"), pid("B")]);
        assert!(matches!(set.take_events().as_slice(), [DomainEvent::Favorite(FavoriteEvent::Loaded { count: 2, .. })]));
    }
}
