//! BambuGoods backend API
//!
//! [`CatalogApi`] is the seam every resource fetches through; [`ApiClient`]
//! is the reqwest implementation used in production.

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::value_objects::{ProductId, UserId};
use crate::{Ack, Article, ArticleSummary, Category, HealthStatus, Language, Product, ALL_CATEGORIES};

/// Errors surfaced by the HTTP client adapter
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Resource not found")]
    NotFound,

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Response parsing failed: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    Url(String),
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError>;
    /// `Ok(None)` when the backend answers 404. Translated fields are
    /// resolved for `language`.
    async fn get_product(&self, id: &ProductId, language: Language) -> Result<Option<Product>, ApiError>;
    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Product>, ApiError>;
    async fn list_categories(&self, language: Language) -> Result<Vec<Category>, ApiError>;
    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>, ApiError>;
    /// `Ok(None)` when the backend answers 404.
    async fn get_article(&self, slug: &str, language: Language) -> Result<Option<Article>, ApiError>;
    async fn related_articles(&self, article_id: &str, language: Language, limit: Option<u32>) -> Result<Vec<ArticleSummary>, ApiError>;
    async fn search_articles(&self, q: &str, language: Language, limit: Option<u32>) -> Result<Vec<ArticleSummary>, ApiError>;
    async fn get_favorites(&self, user_id: &UserId) -> Result<Vec<ProductId>, ApiError>;
    async fn add_favorite(&self, user_id: &UserId, product_id: &ProductId) -> Result<Ack, ApiError>;
    async fn remove_favorite(&self, user_id: &UserId, product_id: &ProductId) -> Result<Ack, ApiError>;
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;
}

/// Drops the `all` sentinel and blank values; the backend treats an absent
/// filter as "no filter".
pub(crate) fn filter_value(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL_CATEGORIES)
        .map(str::to_string)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ProductQuery {
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

impl ProductQuery {
    pub fn new(language: Language) -> Self { Self { language, ..Default::default() } }
    pub fn category(mut self, category: Option<&str>) -> Self { self.category = filter_value(category); self }
    pub fn search(mut self, search: Option<&str>) -> Self { self.search = filter_value(search); self }
    pub fn page(mut self, limit: u32, skip: u32) -> Self { self.limit = Some(limit); self.skip = Some(skip); self }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SearchQuery {
    pub q: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>, language: Language) -> Self {
        Self { q: q.into().trim().to_string(), language, ..Default::default() }
    }
    pub fn category(mut self, category: Option<&str>) -> Self { self.category = filter_value(category); self }
    pub fn is_blank(&self) -> bool { self.q.is_empty() }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ArticleQuery {
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

impl ArticleQuery {
    pub fn new(language: Language) -> Self { Self { language, ..Default::default() } }
    pub fn category(mut self, category: Option<&str>) -> Self { self.category = filter_value(category); self }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_category_is_not_a_filter() {
        assert_eq!(ProductQuery::new(Language::Es).category(Some("all")).category, None);
        assert_eq!(ProductQuery::new(Language::Es).category(None).category, None);
        assert_eq!(ProductQuery::new(Language::Es).category(Some("champu-solido")).category.as_deref(), Some("champu-solido"));
        assert_eq!(ProductQuery::new(Language::En).search(Some("   ")).search, None);
    }

    #[test]
    fn test_search_query_trims() {
        let q = SearchQuery::new("  bambú ", Language::Es).category(Some("all"));
        assert_eq!(q.q, "bambú");
        assert!(q.category.is_none());
        assert!(SearchQuery::new("  ", Language::Es).is_blank());
    }
}
