//! Blog article resources

use async_trait::async_trait;

use super::{Plan, Resource, ResourceSpec};
use crate::api::{ApiError, ArticleQuery, CatalogApi};
use crate::i18n::Message;
use crate::{Article, ArticleSummary, Language};

pub type ArticlesResource = Resource<ArticlesSpec>;
pub type ArticleResource = Resource<ArticleSpec>;
pub type RelatedArticlesResource = Resource<RelatedArticlesSpec>;
pub type ArticleSearchResource = Resource<ArticleSearchSpec>;

/// Related articles shown under an article.
pub const RELATED_LIMIT: u32 = 3;

#[derive(Debug, Default)]
pub struct ArticlesSpec;

#[async_trait]
impl ResourceSpec for ArticlesSpec {
    type Params = ArticleQuery;
    type Data = Vec<ArticleSummary>;

    const NAME: &'static str = "articles";
    const ERROR: Message = Message::LoadArticlesFailed;

    fn initial(&self) -> Self::Data { vec![] }
    fn language(params: &Self::Params) -> Language { params.language }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        api.list_articles(params).await
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleLookup {
    pub slug: Option<String>,
    pub language: Language,
}

impl ArticleLookup {
    pub fn new(slug: &str, language: Language) -> Self {
        let slug = Some(slug.trim().to_string()).filter(|s| !s.is_empty());
        Self { slug, language }
    }
}

/// Single article by slug. `Ok(None)` data means the slug does not exist.
#[derive(Debug, Default)]
pub struct ArticleSpec;

#[async_trait]
impl ResourceSpec for ArticleSpec {
    type Params = ArticleLookup;
    type Data = Option<Article>;

    const NAME: &'static str = "article";
    const ERROR: Message = Message::LoadArticleFailed;

    fn initial(&self) -> Self::Data { None }
    fn language(params: &Self::Params) -> Language { params.language }
    fn plan(params: &Self::Params) -> Plan {
        if params.slug.is_some() { Plan::Fetch } else { Plan::Idle }
    }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        match &params.slug {
            Some(slug) => api.get_article(slug, params.language).await,
            None => Ok(None),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelatedQuery {
    pub article_id: Option<String>,
    pub language: Language,
}

#[derive(Debug, Default)]
pub struct RelatedArticlesSpec;

#[async_trait]
impl ResourceSpec for RelatedArticlesSpec {
    type Params = RelatedQuery;
    type Data = Vec<ArticleSummary>;

    const NAME: &'static str = "related articles";
    const ERROR: Message = Message::LoadRelatedArticlesFailed;

    fn initial(&self) -> Self::Data { vec![] }
    fn language(params: &Self::Params) -> Language { params.language }
    fn plan(params: &Self::Params) -> Plan {
        if params.article_id.is_some() { Plan::Fetch } else { Plan::Idle }
    }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        match &params.article_id {
            Some(id) => api.related_articles(id, params.language, Some(RELATED_LIMIT)).await,
            None => Ok(vec![]),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleSearch {
    pub q: String,
    pub language: Language,
    pub limit: Option<u32>,
}

impl ArticleSearch {
    pub fn new(q: &str, language: Language) -> Self { Self { q: q.trim().to_string(), language, limit: None } }
    pub fn limit(mut self, limit: u32) -> Self { self.limit = Some(limit); self }
}

/// Free-text article search. Blank text clears the results; so does a failure.
#[derive(Debug, Default)]
pub struct ArticleSearchSpec;

#[async_trait]
impl ResourceSpec for ArticleSearchSpec {
    type Params = ArticleSearch;
    type Data = Vec<ArticleSummary>;

    const NAME: &'static str = "article search";
    const ERROR: Message = Message::SearchFailed;
    const CLEAR_ON_ERROR: bool = true;

    fn initial(&self) -> Self::Data { vec![] }
    fn language(params: &Self::Params) -> Language { params.language }
    fn plan(params: &Self::Params) -> Plan {
        if params.q.is_empty() { Plan::Clear } else { Plan::Fetch }
    }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        api.search_articles(&params.q, params.language, params.limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::api_for;
    use crate::resources::FetchStatus;
    use crate::tests::summary_json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_articles_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("category", "champu-solido"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![summary_json("a1", "solid-shampoo-guide", "champu-solido")]))
            .expect(1)
            .mount(&server)
            .await;

        let articles = ArticlesResource::new(api_for(&server), ArticlesSpec);
        articles.load(ArticleQuery::new(Language::En).category(Some("champu-solido"))).await;
        let state = articles.snapshot().await;
        assert_eq!(state.data[0].slug, "solid-shampoo-guide");
    }

    #[tokio::test]
    async fn test_articles_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let articles = ArticlesResource::new(api_for(&server), ArticlesSpec);
        articles.load(ArticleQuery::new(Language::En)).await;
        assert_eq!(articles.snapshot().await.error.as_deref(), Some("Error loading articles"));
    }

    #[tokio::test]
    async fn test_missing_article_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/no-existe"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let article = ArticleResource::new(api_for(&server), ArticleSpec);
        article.load(ArticleLookup::new("no-existe", Language::Es)).await;
        let state = article.snapshot().await;
        assert_eq!(state.status, FetchStatus::Success);
        assert!(state.data.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_related_articles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/a1/related"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![summary_json("a2", "otro", "champu-solido")]))
            .expect(1)
            .mount(&server)
            .await;

        let related = RelatedArticlesResource::new(api_for(&server), RelatedArticlesSpec);
        related.load(RelatedQuery { article_id: None, language: Language::Es }).await;
        assert!(related.snapshot().await.data.is_empty());
        related.load(RelatedQuery { article_id: Some("a1".into()), language: Language::Es }).await;
        assert_eq!(related.snapshot().await.data.len(), 1);
    }

    #[tokio::test]
    async fn test_article_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/articles"))
            .and(query_param("q", "champú"))
            .and(query_param("language", "es"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![summary_json("a1", "guia-champu", "champu-solido")]))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/search/articles"))
            .and(query_param("q", "jabón"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let search = ArticleSearchResource::new(api_for(&server), ArticleSearchSpec);
        search.load(ArticleSearch::new(" champú ", Language::Es).limit(5)).await;
        assert_eq!(search.snapshot().await.data[0].slug, "guia-champu");

        search.load(ArticleSearch::new("jabón", Language::Es)).await;
        let failed = search.snapshot().await;
        assert!(failed.data.is_empty());
        assert_eq!(failed.error.as_deref(), Some("Error en la búsqueda"));

        search.load(ArticleSearch::new("  ", Language::Es)).await;
        let cleared = search.snapshot().await;
        assert_eq!(cleared.status, FetchStatus::Idle);
        assert!(cleared.error.is_none());
    }
}
