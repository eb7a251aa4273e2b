//! Client-visible routes.

use crate::Language;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Blog,
    Article(String),
    NotFound,
}

impl Route {
    /// Resolves a request path, ignoring trailing and repeated slashes.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["blog"] => Self::Blog,
            ["blog", slug] => Self::Article(urlencoding::decode(slug).map(|s| s.into_owned()).unwrap_or_else(|_| slug.to_string())),
            _ => Self::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Blog => "/blog".to_string(),
            Self::Article(slug) => format!("/blog/{}", urlencoding::encode(slug)),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Path with the language carried as a query parameter.
    pub fn href(&self, lang: Language) -> String { format!("{}?lang={}", self.path(), lang) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/blog/"), Route::Blog);
        assert_eq!(Route::parse("/blog/guia-champu-solido"), Route::Article("guia-champu-solido".into()));
        assert_eq!(Route::parse("//blog//guia/"), Route::Article("guia".into()));
        assert_eq!(Route::parse("/blog/a/b"), Route::NotFound);
        assert_eq!(Route::parse("/admin"), Route::NotFound);
    }

    #[test]
    fn test_href() {
        assert_eq!(Route::Article("guia".into()).href(Language::En), "/blog/guia?lang=en");
        assert_eq!(Route::Home.href(Language::Es), "/?lang=es");
    }

    #[test]
    fn test_slug_is_percent_encoded() {
        let route = Route::Article("guía café?".into());
        assert_eq!(route.href(Language::Es), "/blog/gu%C3%ADa%20caf%C3%A9%3F?lang=es");
        assert_eq!(Route::parse(&route.path()), route);
    }
}
