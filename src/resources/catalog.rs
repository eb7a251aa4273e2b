//! Product and category resources

use async_trait::async_trait;

use super::{Plan, Resource, ResourceSpec};
use crate::api::{ApiError, CatalogApi, ProductQuery, SearchQuery};
use crate::domain::value_objects::ProductId;
use crate::i18n::Message;
use crate::{Category, Language, Product};

pub type ProductsResource = Resource<ProductsSpec>;
pub type ProductResource = Resource<ProductSpec>;
pub type CategoriesResource = Resource<CategoriesSpec>;
pub type SearchResource = Resource<SearchSpec>;

/// Filtered product listing. Category and search text are both sent and
/// combined by the backend.
#[derive(Debug, Default)]
pub struct ProductsSpec;

#[async_trait]
impl ResourceSpec for ProductsSpec {
    type Params = ProductQuery;
    type Data = Vec<Product>;

    const NAME: &'static str = "products";
    const ERROR: Message = Message::LoadProductsFailed;

    fn initial(&self) -> Self::Data { vec![] }
    fn language(params: &Self::Params) -> Language { params.language }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        api.list_products(params).await
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductLookup {
    pub id: Option<ProductId>,
    pub language: Language,
}

#[derive(Debug, Default)]
pub struct ProductSpec;

#[async_trait]
impl ResourceSpec for ProductSpec {
    type Params = ProductLookup;
    type Data = Option<Product>;

    const NAME: &'static str = "product";
    const ERROR: Message = Message::LoadProductFailed;

    fn initial(&self) -> Self::Data { None }
    fn language(params: &Self::Params) -> Language { params.language }
    fn plan(params: &Self::Params) -> Plan {
        if params.id.is_some() { Plan::Fetch } else { Plan::Idle }
    }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        match &params.id {
            Some(id) => api.get_product(id, params.language).await,
            None => Ok(None),
        }
    }
}

#[derive(Debug, Default)]
pub struct CategoriesSpec;

#[async_trait]
impl ResourceSpec for CategoriesSpec {
    type Params = Language;
    type Data = Vec<Category>;

    const NAME: &'static str = "categories";
    const ERROR: Message = Message::LoadCategoriesFailed;

    fn initial(&self) -> Self::Data { vec![] }
    fn language(params: &Self::Params) -> Language { *params }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        api.list_categories(*params).await
    }
}

/// Free-text product search. A blank query clears the results without a
/// backend call; a failure clears them too.
#[derive(Debug, Default)]
pub struct SearchSpec;

#[async_trait]
impl ResourceSpec for SearchSpec {
    type Params = SearchQuery;
    type Data = Vec<Product>;

    const NAME: &'static str = "search";
    const ERROR: Message = Message::SearchFailed;
    const CLEAR_ON_ERROR: bool = true;

    fn initial(&self) -> Self::Data { vec![] }
    fn language(params: &Self::Params) -> Language { params.language }
    fn plan(params: &Self::Params) -> Plan {
        if params.is_blank() { Plan::Clear } else { Plan::Fetch }
    }

    async fn fetch(&self, api: &dyn CatalogApi, params: &Self::Params) -> Result<Self::Data, ApiError> {
        api.search_products(params).await
    }
}
