//! User-facing messages in both storefront languages.

use crate::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Message {
    LoadProductsFailed,
    LoadProductFailed,
    LoadCategoriesFailed,
    LoadArticlesFailed,
    LoadArticleFailed,
    LoadRelatedArticlesFailed,
    LoadFavoritesFailed,
    SearchFailed,
    AddFavoriteFailed,
    RemoveFavoriteFailed,
    ArticleNotFound,
    PageNotFound,
    Loading,
    AllProducts,
    FeaturedProducts,
    NoProducts,
    NoArticles,
    Blog,
    BackToBlog,
    RecommendedProducts,
    ViewOnAmazon,
    AffiliateNote,
    RelatedArticles,
    Reviews,
    Favorite,
}

pub fn text(message: Message, lang: Language) -> &'static str {
    use Message::*;
    match (message, lang) {
        (LoadProductsFailed, Language::Es) => "Error al cargar productos",
        (LoadProductsFailed, Language::En) => "Error loading products",
        (LoadProductFailed, Language::Es) => "Error al cargar producto",
        (LoadProductFailed, Language::En) => "Error loading product",
        (LoadCategoriesFailed, Language::Es) => "Error al cargar categorías",
        (LoadCategoriesFailed, Language::En) => "Error loading categories",
        (LoadArticlesFailed, Language::Es) => "Error al cargar artículos",
        (LoadArticlesFailed, Language::En) => "Error loading articles",
        (LoadArticleFailed, Language::Es) => "Error al cargar artículo",
        (LoadArticleFailed, Language::En) => "Error loading article",
        (LoadRelatedArticlesFailed, Language::Es) => "Error al cargar artículos relacionados",
        (LoadRelatedArticlesFailed, Language::En) => "Error loading related articles",
        (LoadFavoritesFailed, Language::Es) => "Error al cargar favoritos",
        (LoadFavoritesFailed, Language::En) => "Error loading favorites",
        (SearchFailed, Language::Es) => "Error en la búsqueda",
        (SearchFailed, Language::En) => "Search error",
        (AddFavoriteFailed, Language::Es) => "Error al agregar a favoritos",
        (AddFavoriteFailed, Language::En) => "Error adding to favorites",
        (RemoveFavoriteFailed, Language::Es) => "Error al quitar de favoritos",
        (RemoveFavoriteFailed, Language::En) => "Error removing from favorites",
        (ArticleNotFound, Language::Es) => "Artículo no encontrado",
        (ArticleNotFound, Language::En) => "Article not found",
        (PageNotFound, Language::Es) => "Página no encontrada",
        (PageNotFound, Language::En) => "Page not found",
        (Loading, Language::Es) => "Cargando...",
        (Loading, Language::En) => "Loading...",
        (AllProducts, Language::Es) => "Todos los productos",
        (AllProducts, Language::En) => "All products",
        (FeaturedProducts, Language::Es) => "Productos destacados",
        (FeaturedProducts, Language::En) => "Featured products",
        (NoProducts, Language::Es) => "No se encontraron productos",
        (NoProducts, Language::En) => "No products found",
        (NoArticles, Language::Es) => "No hay artículos todavía",
        (NoArticles, Language::En) => "No articles yet",
        (Blog, _) => "Blog",
        (BackToBlog, Language::Es) => "Volver al Blog",
        (BackToBlog, Language::En) => "Back to Blog",
        (RecommendedProducts, Language::Es) => "Productos Recomendados",
        (RecommendedProducts, Language::En) => "Recommended Products",
        (ViewOnAmazon, Language::Es) => "Ver en Amazon",
        (ViewOnAmazon, Language::En) => "View on Amazon",
        (AffiliateNote, Language::Es) => "Nota: los enlaces de Amazon son enlaces de afiliado.",
        (AffiliateNote, Language::En) => "Note: Amazon links are affiliate links.",
        (RelatedArticles, Language::Es) => "Artículos relacionados",
        (RelatedArticles, Language::En) => "Related articles",
        (Reviews, Language::Es) => "reseñas",
        (Reviews, Language::En) => "reviews",
        (Favorite, Language::Es) => "Favorito",
        (Favorite, Language::En) => "Favorite",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_localized() {
        assert_eq!(text(Message::LoadArticlesFailed, Language::En), "Error loading articles");
        assert_eq!(text(Message::LoadArticlesFailed, Language::Es), "Error al cargar artículos");
        assert_eq!(text(Message::ArticleNotFound, Language::En), "Article not found");
    }
}
