//! Favorites resource with membership mutations

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{FetchState, Resource, ResourceSpec};
use crate::api::{ApiError, CatalogApi};
use crate::domain::aggregates::FavoriteSet;
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::{ProductId, UserId};
use crate::i18n::{self, Message};
use crate::{Language, Result, StorefrontError};

/// Fetches one visitor's favorites. The language only selects the error text.
#[derive(Debug)]
pub struct FavoritesSpec {
    user_id: UserId,
}

impl FavoritesSpec {
    pub fn new(user_id: UserId) -> Self { Self { user_id } }
}

#[async_trait]
impl ResourceSpec for FavoritesSpec {
    type Params = Language;
    type Data = FavoriteSet;

    const NAME: &'static str = "favorites";
    const ERROR: Message = Message::LoadFavoritesFailed;
    const CLEAR_ON_ERROR: bool = true;

    fn initial(&self) -> Self::Data { FavoriteSet::new(self.user_id.clone()) }
    fn language(params: &Self::Params) -> Language { *params }

    async fn fetch(&self, api: &dyn CatalogApi, _params: &Self::Params) -> std::result::Result<Self::Data, ApiError> {
        let ids = api.get_favorites(&self.user_id).await?;
        let mut set = self.initial();
        set.replace(ids);
        Ok(set)
    }
}

/// One async lock per key, created on first use. Entries nobody holds or
/// waits on are pruned on the next acquire.
pub struct KeyedLocks<K> {
    locks: Arc<Mutex<HashMap<K, Arc<Mutex<()>>>>>,
}

impl<K> Clone for KeyedLocks<K> {
    fn clone(&self) -> Self { Self { locks: self.locks.clone() } }
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self { Self { locks: Arc::new(Mutex::new(HashMap::new())) } }
}

impl<K: Eq + Hash> KeyedLocks<K> {
    pub fn new() -> Self { Self::default() }

    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(key).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub async fn len(&self) -> usize { self.locks.lock().await.len() }
}

/// A visitor's favorites: the fetched membership plus add/remove/toggle.
///
/// Local membership only changes after the backend call succeeds. Toggles
/// on the same product are serialized, so a double toggle always settles
/// back where it started.
#[derive(Clone)]
pub struct Favorites {
    resource: Resource<FavoritesSpec>,
    api: Arc<dyn CatalogApi>,
    user_id: UserId,
    language: Language,
    toggles: KeyedLocks<ProductId>,
}

impl Favorites {
    pub fn new(api: Arc<dyn CatalogApi>, user_id: UserId, language: Language) -> Self {
        let resource = Resource::new(api.clone(), FavoritesSpec::new(user_id.clone()));
        Self { resource, api, user_id, language, toggles: KeyedLocks::new() }
    }

    pub fn user_id(&self) -> &UserId { &self.user_id }

    pub async fn load(&self) { self.resource.load(self.language).await }
    pub async fn refetch(&self) { self.resource.refetch().await }
    pub async fn snapshot(&self) -> FetchState<FavoriteSet> { self.resource.snapshot().await }

    pub async fn ids(&self) -> Vec<ProductId> { self.resource.update_data(|set| set.items().to_vec()).await }

    pub async fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.resource.update_data(|set| set.contains(product_id)).await
    }

    pub async fn add_favorite(&self, product_id: &ProductId) -> Result<()> {
        if let Err(e) = self.api.add_favorite(&self.user_id, product_id).await {
            tracing::error!("Error adding favorite {}: {}", product_id, e);
            return Err(self.failure(Message::AddFavoriteFailed));
        }
        self.resource.update_data(|set| set.add(product_id.clone())).await;
        Ok(())
    }

    pub async fn remove_favorite(&self, product_id: &ProductId) -> Result<()> {
        if let Err(e) = self.api.remove_favorite(&self.user_id, product_id).await {
            tracing::error!("Error removing favorite {}: {}", product_id, e);
            return Err(self.failure(Message::RemoveFavoriteFailed));
        }
        self.resource.update_data(|set| set.remove(product_id)).await;
        Ok(())
    }

    /// Drives membership to `target`; no backend call when already there.
    pub async fn set_favorite(&self, product_id: &ProductId, target: bool) -> Result<()> {
        if self.is_favorite(product_id).await == target {
            return Ok(());
        }
        if target { self.add_favorite(product_id).await } else { self.remove_favorite(product_id).await }
    }

    /// Flips membership. Returns the new membership.
    pub async fn toggle_favorite(&self, product_id: &ProductId) -> Result<bool> {
        let _guard = self.toggles.acquire(product_id.clone()).await;
        let target = !self.is_favorite(product_id).await;
        self.set_favorite(product_id, target).await?;
        Ok(target)
    }

    pub async fn take_events(&self) -> Vec<DomainEvent> { self.resource.update_data(|set| set.take_events()).await }

    fn failure(&self, message: Message) -> StorefrontError {
        StorefrontError::Favorite(i18n::text(message, self.language).to_string())
    }
}
