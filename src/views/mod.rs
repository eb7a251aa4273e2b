//! Page view models
//!
//! Each view composes resources with its own local UI state and renders the
//! result. Filtering is delegated to the backend through resource params;
//! views never filter locally.

pub mod render;

use std::sync::Arc;

use crate::api::{ArticleQuery, CatalogApi, ProductQuery};
use crate::domain::value_objects::UserId;
use crate::i18n::{text, Message};
use crate::resources::{
    ArticleLookup, ArticleResource, ArticleSearch, ArticleSearchResource, ArticleSearchSpec, ArticleSpec, ArticlesResource, ArticlesSpec, CategoriesResource, CategoriesSpec, Favorites,
    FetchStatus, ProductsResource, ProductsSpec, RelatedArticlesResource, RelatedArticlesSpec, RelatedQuery,
};
use crate::routes::Route;
use crate::{Language, ALL_CATEGORIES};

/// Catalog home: category filter, search box, favorites markers.
pub struct HomeView {
    language: Language,
    selected_category: String,
    search_text: String,
    menu_open: bool,
    products: ProductsResource,
    categories: CategoriesResource,
    favorites: Favorites,
}

impl HomeView {
    pub fn new(api: Arc<dyn CatalogApi>, user_id: UserId, language: Language) -> Self {
        Self {
            language,
            selected_category: ALL_CATEGORIES.to_string(),
            search_text: String::new(),
            menu_open: false,
            products: ProductsResource::new(api.clone(), ProductsSpec),
            categories: CategoriesResource::new(api.clone(), CategoriesSpec),
            favorites: Favorites::new(api, user_id, language),
        }
    }

    pub fn language(&self) -> Language { self.language }
    pub fn selected_category(&self) -> &str { &self.selected_category }
    pub fn search_text(&self) -> &str { &self.search_text }
    pub fn menu_open(&self) -> bool { self.menu_open }
    pub fn favorites(&self) -> &Favorites { &self.favorites }
    pub fn products(&self) -> &ProductsResource { &self.products }

    pub fn select_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.selected_category = if category.trim().is_empty() { ALL_CATEGORIES.to_string() } else { category.trim().to_string() };
    }

    pub fn set_search(&mut self, search: impl Into<String>) { self.search_text = search.into(); }
    pub fn toggle_menu(&mut self) { self.menu_open = !self.menu_open; }

    /// Category and search text are sent together; the backend ANDs them.
    pub fn product_query(&self) -> ProductQuery {
        ProductQuery::new(self.language)
            .category(Some(self.selected_category.as_str()))
            .search(Some(self.search_text.as_str()))
    }

    pub async fn load(&self) {
        futures::join!(
            self.products.load(self.product_query()),
            self.categories.load(self.language),
            self.favorites.load(),
        );
    }

    pub async fn render(&self) -> String {
        let lang = self.language;
        let products = self.products.snapshot().await;
        let categories = self.categories.snapshot().await;
        let favorites = self.favorites.snapshot().await;

        let heading = if self.selected_category == ALL_CATEGORIES { Message::AllProducts } else { Message::FeaturedProducts };
        let mut body = render::category_filters(lang, &categories.data, &self.selected_category, &self.search_text);
        body.push_str(&format!("<h1>{}</h1>", text(heading, lang)));
        if let Some(error) = &products.error {
            body.push_str(&render::error_banner(error));
        }
        if products.loading {
            body.push_str(&render::loading(lang));
        } else {
            body.push_str(&render::product_grid(lang, &products.data, &favorites.data));
        }
        render::layout(lang, text(heading, lang), &Route::Home, self.menu_open, &body)
    }
}

/// Article listing, optionally narrowed to one category. Non-blank search
/// text replaces the listing with search results.
pub struct BlogView {
    language: Language,
    selected_category: String,
    search_text: String,
    articles: ArticlesResource,
    search: ArticleSearchResource,
}

impl BlogView {
    pub fn new(api: Arc<dyn CatalogApi>, language: Language) -> Self {
        Self {
            language,
            selected_category: ALL_CATEGORIES.to_string(),
            search_text: String::new(),
            articles: ArticlesResource::new(api.clone(), ArticlesSpec),
            search: ArticleSearchResource::new(api, ArticleSearchSpec),
        }
    }

    pub fn select_category(&mut self, category: impl Into<String>) { self.selected_category = category.into(); }
    pub fn set_search(&mut self, search: impl Into<String>) { self.search_text = search.into(); }

    fn searching(&self) -> bool { !self.search_text.trim().is_empty() }

    pub async fn load(&self) {
        if self.searching() {
            self.search.load(ArticleSearch::new(&self.search_text, self.language)).await;
        } else {
            self.articles.load(ArticleQuery::new(self.language).category(Some(self.selected_category.as_str()))).await;
        }
    }

    pub async fn render(&self) -> String {
        let lang = self.language;
        let articles = if self.searching() { self.search.snapshot().await } else { self.articles.snapshot().await };
        let mut body = format!(
            "<h1>{}</h1><form method=\"get\" action=\"/blog\"><input type=\"hidden\" name=\"lang\" value=\"{lang}\">\
             <input type=\"search\" name=\"search\" value=\"{}\"></form>",
            text(Message::Blog, lang),
            render::escape(&self.search_text),
        );
        match &articles.error {
            Some(error) => body.push_str(&render::error_banner(error)),
            None => body.push_str(&render::article_list(lang, &articles.data)),
        }
        render::layout(lang, text(Message::Blog, lang), &Route::Blog, false, &body)
    }
}

/// Outcome of an article lookup as the page sees it.
#[derive(Clone, Debug, PartialEq)]
pub enum ArticleOutcome {
    Found,
    NotFound,
    Failed(String),
}

/// Single article plus related reading.
pub struct ArticleView {
    language: Language,
    slug: String,
    article: ArticleResource,
    related: RelatedArticlesResource,
}

impl ArticleView {
    pub fn new(api: Arc<dyn CatalogApi>, slug: impl Into<String>, language: Language) -> Self {
        Self {
            language,
            slug: slug.into(),
            article: ArticleResource::new(api.clone(), ArticleSpec),
            related: RelatedArticlesResource::new(api, RelatedArticlesSpec),
        }
    }

    pub async fn load(&self) {
        self.article.load(ArticleLookup::new(&self.slug, self.language)).await;
        let article_id = self.article.snapshot().await.data.map(|a| a.id);
        self.related.load(RelatedQuery { article_id, language: self.language }).await;
    }

    pub async fn outcome(&self) -> ArticleOutcome {
        let state = self.article.snapshot().await;
        match (state.error, state.data) {
            (Some(error), _) => ArticleOutcome::Failed(error),
            (None, Some(_)) => ArticleOutcome::Found,
            (None, None) => ArticleOutcome::NotFound,
        }
    }

    pub async fn render(&self) -> String {
        let lang = self.language;
        let route = Route::Article(self.slug.clone());
        let state = self.article.snapshot().await;
        if state.status == FetchStatus::Loading {
            return render::layout(lang, text(Message::Loading, lang), &route, false, &render::loading(lang));
        }
        match (state.error, state.data) {
            (Some(error), _) => render::layout(lang, &error, &route, false, &render::error_banner(&error)),
            (None, None) => {
                let message = text(Message::ArticleNotFound, lang);
                render::layout(lang, message, &route, false, &render::error_banner(message))
            }
            (None, Some(article)) => {
                let related = self.related.snapshot().await;
                let title = if article.seo_title.is_empty() { article.title.clone() } else { article.seo_title.clone() };
                render::layout(lang, &title, &route, false, &render::article_detail(lang, &article, &related.data))
            }
        }
    }
}
