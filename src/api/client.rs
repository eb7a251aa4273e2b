//! reqwest implementation of [`CatalogApi`]

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::{ApiError, ArticleQuery, CatalogApi, ProductQuery, SearchQuery};
use crate::config::Config;
use crate::domain::value_objects::{ProductId, UserId};
use crate::{Ack, Article, ArticleSummary, Category, FavoriteList, HealthStatus, Language, NewFavorite, Product, ProductPayload};

/// Single choke point for outbound backend calls. Every request carries the
/// configured timeout and a JSON content type, and is logged on send and on
/// receipt. No retries, caching or deduplication.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base = Url::parse(&config.api_base()).map_err(|e| ApiError::Url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Url(config.api_base()));
        }
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str { self.base.as_str() }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn call<T, Q, B>(&self, method: Method, segments: &[&str], query: Option<&Q>, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        tracing::info!("API Request: {} {}", method, path);

        let mut request = self.client.request(method, url).header("Content-Type", "application/json");
        if let Some(q) = query { request = request.query(q); }
        if let Some(b) = body { request = request.json(b); }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Response error: {} {}", path, e);
            if e.is_timeout() { ApiError::Timeout } else { ApiError::Request(e.to_string()) }
        })?;

        let status = response.status();
        tracing::info!("API Response: {} {}", status.as_u16(), path);
        match status {
            s if s.is_success() => response.json::<T>().await.map_err(|e| {
                tracing::error!("Response error: {} {}", path, e);
                if e.is_timeout() { ApiError::Timeout } else { ApiError::Decode(e.to_string()) }
            }),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            s => {
                let message = response.text().await.unwrap_or_default();
                tracing::error!("Response error: {} {} {}", s.as_u16(), path, message);
                Err(ApiError::Status { status: s.as_u16(), message })
            }
        }
    }

    async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(&self, segments: &[&str], query: Option<&Q>) -> Result<T, ApiError> {
        self.call::<T, Q, ()>(Method::GET, segments, query, None).await
    }
}

fn found<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(ApiError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.get(&["products"], Some(query)).await
    }

    async fn get_product(&self, id: &ProductId, language: Language) -> Result<Option<Product>, ApiError> {
        let payload: Option<ProductPayload> = found(self.get::<_, ()>(&["products", id.as_str()], None).await)?;
        Ok(payload.map(|p| p.into_product(language)))
    }

    async fn search_products(&self, query: &SearchQuery) -> Result<Vec<Product>, ApiError> {
        self.get(&["search"], Some(query)).await
    }

    async fn list_categories(&self, language: Language) -> Result<Vec<Category>, ApiError> {
        self.get(&["categories"], Some(&json!({ "language": language }))).await
    }

    async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>, ApiError> {
        self.get(&["articles"], Some(query)).await
    }

    async fn get_article(&self, slug: &str, language: Language) -> Result<Option<Article>, ApiError> {
        if slug.trim().is_empty() {
            return Ok(None);
        }
        found(self.get(&["articles", slug], Some(&json!({ "language": language }))).await)
    }

    async fn related_articles(&self, article_id: &str, language: Language, limit: Option<u32>) -> Result<Vec<ArticleSummary>, ApiError> {
        let query = match limit {
            Some(limit) => json!({ "language": language, "limit": limit }),
            None => json!({ "language": language }),
        };
        self.get(&["articles", article_id, "related"], Some(&query)).await
    }

    async fn search_articles(&self, q: &str, language: Language, limit: Option<u32>) -> Result<Vec<ArticleSummary>, ApiError> {
        let query = match limit {
            Some(limit) => json!({ "q": q, "language": language, "limit": limit }),
            None => json!({ "q": q, "language": language }),
        };
        self.get(&["search", "articles"], Some(&query)).await
    }

    async fn get_favorites(&self, user_id: &UserId) -> Result<Vec<ProductId>, ApiError> {
        let list: FavoriteList = self.get::<_, ()>(&["favorites", user_id.as_str()], None).await?;
        list.favorites
            .into_iter()
            .map(|id| ProductId::new(id).map_err(|e| ApiError::Decode(e.to_string())))
            .collect()
    }

    async fn add_favorite(&self, user_id: &UserId, product_id: &ProductId) -> Result<Ack, ApiError> {
        let body = NewFavorite { user_id: user_id.to_string(), product_id: product_id.to_string() };
        self.call::<_, (), _>(Method::POST, &["favorites"], None, Some(&body)).await
    }

    async fn remove_favorite(&self, user_id: &UserId, product_id: &ProductId) -> Result<Ack, ApiError> {
        self.call::<_, (), ()>(Method::DELETE, &["favorites", user_id.as_str(), product_id.as_str()], None, None).await
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.get::<_, ()>(&[""], None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::product_json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&Config::new(server.uri()).unwrap()).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(&Config::new("http://localhost:8001/").unwrap()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8001/api");
        assert_eq!(client.url(&["products", "abc"]).unwrap().path(), "/api/products/abc");
        assert_eq!(client.url(&[""]).unwrap().path(), "/api/");
    }

    #[tokio::test]
    async fn test_categories_for_spanish() {
        let server = MockServer::start().await;
        let ids = ["cepillos-bambu", "champu-solido", "cuidado-facial", "kits-sostenibles", "cuidado-personal", "cuidado-corporal"];
        let body: Vec<_> = ids.iter().map(|id| json!({ "id": id, "name": id, "icon": "leaf" })).collect();
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .and(query_param("language", "es"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let categories = client_for(&server).await.list_categories(Language::Es).await.unwrap();
        let got: Vec<_> = categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(got, ids);
    }

    #[tokio::test]
    async fn test_list_products_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("language", "en"))
            .and(query_param("category", "champu-solido"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![product_json("2", "Solid shampoo", "champu-solido")]))
            .expect(1)
            .mount(&server)
            .await;

        let query = ProductQuery::new(Language::En).category(Some("champu-solido"));
        let products = client_for(&server).await.list_products(&query).await.unwrap();
        assert_eq!(products.len(), 1);
        assert!(products.iter().all(|p| p.category == "champu-solido"));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/no-existe"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Article not found" })))
            .mount(&server)
            .await;

        let article = client_for(&server).await.get_article("no-existe", Language::Es).await.unwrap();
        assert!(article.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.list_products(&ProductQuery::new(Language::Es)).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let mut config = Config::new(server.uri()).unwrap();
        config.request_timeout_secs = 1;
        let err = ApiClient::new(&config).unwrap().health_check().await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
    }

    #[tokio::test]
    async fn test_favorite_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/favorites/user_abc_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "favorites": ["p1", "p2"] })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/favorites"))
            .and(body_json(json!({ "userId": "user_abc_1", "productId": "p3" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Product added to favorites" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/favorites/user_abc_1/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Product removed from favorites" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let user = UserId::new("user_abc_1").unwrap();
        let ids = client.get_favorites(&user).await.unwrap();
        assert_eq!(ids, vec![ProductId::new("p1").unwrap(), ProductId::new("p2").unwrap()]);
        client.add_favorite(&user, &ProductId::new("p3").unwrap()).await.unwrap();
        let ack = client.remove_favorite(&user, &ProductId::new("p1").unwrap()).await.unwrap();
        assert_eq!(ack.message, "Product removed from favorites");
    }

    #[tokio::test]
    async fn test_search_articles_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/articles"))
            .and(query_param("q", "bambú"))
            .and(query_param("language", "en"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![crate::tests::summary_json("a1", "bamboo-guide", "cepillos-bambu")]))
            .expect(1)
            .mount(&server)
            .await;

        let found = client_for(&server).await.search_articles("bambú", Language::En, Some(10)).await.unwrap();
        assert_eq!(found[0].slug, "bamboo-guide");
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "BambuGoods API is running", "version": "1.0.0" })))
            .mount(&server)
            .await;

        let health = client_for(&server).await.health_check().await.unwrap();
        assert_eq!(health.version, "1.0.0");
    }
}
