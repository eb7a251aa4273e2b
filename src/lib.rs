//! BambuGoods Storefront
//!
//! Bilingual (Spanish/English) affiliate storefront backed by the BambuGoods API.
//!
//! ## Features
//! - Product catalog with category and free-text filters
//! - Favorites scoped to a pseudo-anonymous visitor id
//! - Blog articles with embedded Amazon recommendations
//! - Server-side rendered pages for `/`, `/blog` and `/blog/:slug`

pub mod api;
pub mod config;
pub mod domain;
pub mod i18n;
pub mod identity;
pub mod resources;
pub mod routes;
pub mod server;
pub mod views;

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::value_objects::Money;

// =============================================================================
// Core Types
// =============================================================================

/// Content language. Passed explicitly to every data-access call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.code()) }
}

impl FromStr for Language {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Self::Es),
            "en" => Ok(Self::En),
            other => Err(StorefrontError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub image: String,
    pub amazon_link: String,
    pub rating: f32,
    pub reviews: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    pub fn price(&self) -> Money { Money::eur(self.price) }
    pub fn original_price(&self) -> Money { Money::eur(self.original_price) }

    /// Whole-percent saving against the original price, if any.
    pub fn discount_percent(&self) -> Option<u32> {
        if self.original_price <= self.price || self.original_price.is_zero() {
            return None;
        }
        let pct = (self.original_price - self.price) / self.original_price * Decimal::ONE_HUNDRED;
        pct.round().to_u32()
    }

    /// Rating clamped to the 0..=5 star scale.
    pub fn stars(&self) -> f32 { self.rating.clamp(0.0, 5.0) }
}

/// Text stored in both languages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub es: String,
    pub en: String,
}

impl TranslatedText {
    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::Es => &self.es,
            Language::En => &self.en,
        }
    }
}

/// Product as stored by the backend, with every translation. The lookup by
/// id returns this shape instead of the localized listing shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProduct {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: TranslatedText,
    pub description: TranslatedText,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub image: String,
    pub amazon_link: String,
    pub rating: f32,
    pub reviews: u32,
    #[serde(default)]
    pub features: HashMap<String, Vec<String>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl StoredProduct {
    /// Resolves translated fields; features fall back to Spanish when the
    /// requested language has none.
    pub fn localize(mut self, lang: Language) -> Product {
        let features = self
            .features
            .remove(lang.code())
            .or_else(|| self.features.remove(Language::Es.code()))
            .unwrap_or_default();
        Product {
            name: self.name.get(lang).to_string(),
            description: self.description.get(lang).to_string(),
            id: self.id,
            category: self.category,
            price: self.price,
            original_price: self.original_price,
            image: self.image,
            amazon_link: self.amazon_link,
            rating: self.rating,
            reviews: self.reviews,
            features,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Either product shape the backend may answer with.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductPayload {
    Localized(Product),
    Stored(StoredProduct),
}

impl ProductPayload {
    pub fn into_product(self, lang: Language) -> Product {
        match self {
            Self::Localized(product) => product,
            Self::Stored(stored) => stored.localize(lang),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendation {
    pub title: String,
    pub description: String,
    pub amazon_link: String,
    pub position: u32,
}

/// Full article as returned by the slug lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    #[serde(default)]
    pub products: Vec<ProductRecommendation>,
    pub featured_image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
    pub published_date: NaiveDateTime,
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
}

impl Article {
    /// Recommendations in their editorial order.
    pub fn ordered_products(&self) -> Vec<&ProductRecommendation> {
        let mut products: Vec<_> = self.products.iter().collect();
        products.sort_by_key(|p| p.position);
        products
    }
}

/// Article listing entry (no body, recommendations or SEO data).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub category: String,
    pub featured_image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    pub published_date: NaiveDateTime,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteList {
    #[serde(default)]
    pub favorites: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub user_id: String,
    pub product_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
}

fn default_true() -> bool { true }

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("{0}")]
    Favorite(String),

    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Identity(#[from] identity::IdentityError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
