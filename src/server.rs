//! HTTP front end serving the rendered storefront pages.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::CatalogApi;
use crate::domain::value_objects::{ProductId, UserId};
use crate::i18n::{text, Message};
use crate::identity::{load_or_create, CookieStore};
use crate::resources::{Favorites, FetchStatus, KeyedLocks};
use crate::routes::Route;
use crate::views::{render, ArticleView, BlogView, HomeView};
use crate::Language;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CatalogApi>,
    /// Serializes favorite toggles per visitor and product across requests.
    pub toggles: KeyedLocks<(UserId, ProductId)>,
}

impl AppState {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self { Self { api, toggles: KeyedLocks::new() } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/blog", get(blog))
        .route("/blog/:slug", get(article))
        .route("/favorites/:product_id", post(toggle_favorite))
        .route("/health", get(health))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub lang: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub menu: Option<bool>,
}

impl PageParams {
    fn language(&self) -> Language {
        self.lang.as_deref().and_then(|l| l.parse().ok()).unwrap_or_default()
    }
}

/// Visitor identity from the cookie, plus any `Set-Cookie` it requires.
fn visitor(headers: &HeaderMap) -> Result<(UserId, Vec<String>), (StatusCode, String)> {
    let cookies = CookieStore::from_header(headers.get(header::COOKIE).and_then(|v| v.to_str().ok()));
    let user_id = load_or_create(&cookies).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((user_id, cookies.set_cookie_headers()))
}

fn with_cookies(mut response: Response, cookies: Vec<String>) -> Response {
    for cookie in cookies {
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

async fn home(State(s): State<AppState>, Query(p): Query<PageParams>, headers: HeaderMap) -> Result<Response, (StatusCode, String)> {
    let (user_id, cookies) = visitor(&headers)?;
    let mut view = HomeView::new(s.api.clone(), user_id, p.language());
    if let Some(category) = &p.category { view.select_category(category.as_str()); }
    if let Some(search) = &p.search { view.set_search(search.as_str()); }
    if p.menu.unwrap_or(false) { view.toggle_menu(); }
    view.load().await;
    Ok(with_cookies(Html(view.render().await).into_response(), cookies))
}

async fn blog(State(s): State<AppState>, Query(p): Query<PageParams>) -> Html<String> {
    let mut view = BlogView::new(s.api.clone(), p.language());
    if let Some(category) = &p.category { view.select_category(category.as_str()); }
    if let Some(search) = &p.search { view.set_search(search.as_str()); }
    view.load().await;
    Html(view.render().await)
}

async fn article(State(s): State<AppState>, Path(slug): Path<String>, Query(p): Query<PageParams>) -> Html<String> {
    let view = ArticleView::new(s.api.clone(), slug, p.language());
    view.load().await;
    Html(view.render().await)
}

async fn toggle_favorite(
    State(s): State<AppState>,
    Path(product_id): Path<String>,
    Query(p): Query<PageParams>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let lang = p.language();
    let product_id = ProductId::new(product_id).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let (user_id, cookies) = visitor(&headers)?;
    let _guard = s.toggles.acquire((user_id.clone(), product_id.clone())).await;

    let favorites = Favorites::new(s.api.clone(), user_id, lang);
    favorites.load().await;
    let loaded = favorites.snapshot().await;
    if loaded.status == FetchStatus::Error {
        let message = loaded.error.unwrap_or_else(|| text(Message::LoadFavoritesFailed, lang).to_string());
        return Ok(with_cookies(favorite_failure(lang, &message), cookies));
    }
    favorites.take_events().await;

    if let Err(e) = favorites.toggle_favorite(&product_id).await {
        return Ok(with_cookies(favorite_failure(lang, &e.to_string()), cookies));
    }
    for event in favorites.take_events().await {
        tracing::info!("favorite event: {:?}", event);
    }
    Ok(with_cookies(Redirect::to(&Route::Home.href(lang)).into_response(), cookies))
}

fn favorite_failure(lang: Language, message: &str) -> Response {
    let page = render::layout(lang, message, &Route::Home, false, &render::error_banner(message));
    (StatusCode::BAD_GATEWAY, Html(page)).into_response()
}

async fn health(State(s): State<AppState>) -> Response {
    match s.api.health_check().await {
        Ok(backend) => Json(serde_json::json!({ "status": "healthy", "service": "bambu-storefront", "backend": backend })).into_response(),
        Err(e) => {
            tracing::warn!("backend health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({ "status": "degraded", "service": "bambu-storefront" }))).into_response()
        }
    }
}

/// Redirects non-canonical spellings of known routes; everything else is 404.
async fn fallback(OriginalUri(uri): OriginalUri, Query(p): Query<PageParams>) -> Response {
    let lang = p.language();
    match Route::parse(uri.path()) {
        Route::NotFound => {
            let message = text(Message::PageNotFound, lang);
            (StatusCode::NOT_FOUND, Html(render::layout(lang, message, &Route::Home, false, &render::error_banner(message)))).into_response()
        }
        route => Redirect::permanent(&route.href(lang)).into_response(),
    }
}
