//! Fetch-on-parameter-change resources
//!
//! A [`Resource`] owns the `{data, loading, error}` lifecycle of one backend
//! resource. Calling [`Resource::load`] with parameters that differ from the
//! last ones issues a new fetch; every fetch is tagged with a sequence number
//! and only the latest issued fetch may write its outcome back, so a slow,
//! superseded response can never overwrite newer state.
//!
//! Failures are logged and replaced by a fixed localized message; the
//! underlying cause never reaches the caller.

mod blog;
mod catalog;
mod favorites;

pub use blog::{ArticleLookup, ArticleResource, ArticleSearch, ArticleSearchResource, ArticleSearchSpec, ArticleSpec, ArticlesResource, ArticlesSpec, RelatedArticlesResource, RelatedArticlesSpec, RelatedQuery};
pub use catalog::{CategoriesResource, CategoriesSpec, ProductLookup, ProductResource, ProductSpec, ProductsResource, ProductsSpec, SearchResource, SearchSpec};
pub use favorites::{Favorites, FavoritesSpec, KeyedLocks};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::{ApiError, CatalogApi};
use crate::i18n::{self, Message};
use crate::Language;

/// What a resource does with a given set of parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plan {
    Fetch,
    /// Nothing to look up yet (e.g. no identifier); data is left alone.
    Idle,
    /// Reset data to its initial value without calling the backend.
    Clear,
}

#[async_trait]
pub trait ResourceSpec: Send + Sync + 'static {
    type Params: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;
    type Data: Clone + Send + Sync + 'static;

    /// Used in log lines.
    const NAME: &'static str;
    const ERROR: Message;
    /// Whether a failed fetch resets data instead of keeping the stale value.
    const CLEAR_ON_ERROR: bool = false;

    fn initial(&self) -> Self::Data;
    fn language(params: &Self::Params) -> Language;
    fn plan(_params: &Self::Params) -> Plan { Plan::Fetch }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// Never fetched, or skipped; data is initial or stale.
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Point-in-time view of a resource.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
    pub status: FetchStatus,
}

struct Inner<S: ResourceSpec> {
    params: Option<S::Params>,
    data: S::Data,
    loading: bool,
    error: Option<String>,
    status: FetchStatus,
    issued: u64,
}

pub struct Resource<S: ResourceSpec> {
    api: Arc<dyn CatalogApi>,
    spec: Arc<S>,
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S: ResourceSpec> Clone for Resource<S> {
    fn clone(&self) -> Self {
        Self { api: self.api.clone(), spec: self.spec.clone(), inner: self.inner.clone() }
    }
}

impl<S: ResourceSpec> Resource<S> {
    pub fn new(api: Arc<dyn CatalogApi>, spec: S) -> Self {
        let inner = Inner { params: None, data: spec.initial(), loading: false, error: None, status: FetchStatus::Idle, issued: 0 };
        Self { api, spec: Arc::new(spec), inner: Arc::new(Mutex::new(inner)) }
    }

    /// Fetches when `params` differ from the last requested ones.
    pub async fn load(&self, params: S::Params) {
        {
            let mut inner = self.inner.lock().await;
            if inner.params.as_ref() == Some(&params) {
                return;
            }
            inner.params = Some(params.clone());
        }
        self.run(params).await;
    }

    /// Re-runs the fetch with the current parameters.
    pub async fn refetch(&self) {
        let params = self.inner.lock().await.params.clone();
        if let Some(params) = params {
            self.run(params).await;
        }
    }

    pub async fn snapshot(&self) -> FetchState<S::Data> {
        let inner = self.inner.lock().await;
        FetchState { data: inner.data.clone(), loading: inner.loading, error: inner.error.clone(), status: inner.status }
    }

    pub async fn params(&self) -> Option<S::Params> { self.inner.lock().await.params.clone() }

    /// Applies a local change to the current data.
    pub(crate) async fn update_data<R>(&self, f: impl FnOnce(&mut S::Data) -> R) -> R {
        f(&mut self.inner.lock().await.data)
    }

    async fn run(&self, params: S::Params) {
        let seq = {
            let mut inner = self.inner.lock().await;
            inner.issued += 1;
            match S::plan(&params) {
                Plan::Fetch => {}
                Plan::Idle => {
                    inner.loading = false;
                    inner.status = FetchStatus::Idle;
                    return;
                }
                Plan::Clear => {
                    inner.data = self.spec.initial();
                    inner.loading = false;
                    inner.error = None;
                    inner.status = FetchStatus::Idle;
                    return;
                }
            }
            inner.loading = true;
            inner.error = None;
            inner.status = FetchStatus::Loading;
            inner.issued
        };

        let result = self.spec.fetch(self.api.as_ref(), &params).await;

        let mut inner = self.inner.lock().await;
        if inner.issued != seq {
            tracing::debug!("discarding stale {} response #{} (latest #{})", S::NAME, seq, inner.issued);
            return;
        }
        inner.loading = false;
        match result {
            Ok(data) => {
                inner.data = data;
                inner.status = FetchStatus::Success;
            }
            Err(e) => {
                tracing::error!("Error fetching {}: {}", S::NAME, e);
                inner.error = Some(i18n::text(S::ERROR, S::language(&params)).to_string());
                inner.status = FetchStatus::Error;
                if S::CLEAR_ON_ERROR {
                    inner.data = self.spec.initial();
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use wiremock::MockServer;

    use crate::api::{ApiClient, CatalogApi};
    use crate::config::Config;

    pub(crate) fn api_for(server: &MockServer) -> Arc<dyn CatalogApi> {
        Arc::new(ApiClient::new(&Config::new(server.uri()).unwrap()).unwrap())
    }
}
