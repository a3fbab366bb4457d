//! # Catalog Service
//!
//! The six catalog operations. A service is built per request from a
//! product repository and the request's tracing span; it holds no other
//! state.
//!
//! ```text
//! ┌──────────────┬────────────────────┬──────────────────────────────────┐
//! │ Operation    │ Success            │ Failure                          │
//! ├──────────────┼────────────────────┼──────────────────────────────────┤
//! │ list         │ Vec<Product>       │ store error                      │
//! │ new_form     │ empty ProductForm  │ never                            │
//! │ create       │ Product (with id)  │ Validation, nothing persisted    │
//! │ search       │ Vec<Product>       │ BadRequest on blank keyword      │
//! │ details      │ Product            │ NotFound                         │
//! │ delete       │ removed Product    │ NotFound, nothing changed        │
//! └──────────────┴────────────────────┴──────────────────────────────────┘
//! ```

use tracing::{info, warn, Span};

use crate::error::ApiResult;
use crate::views::ProductForm;
use catalog_core::{validate_candidate, CandidateProduct, CoreError, Product};
use catalog_db::ProductRepository;

/// Request-scoped catalog operations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    products: ProductRepository,
    span: Span,
}

impl CatalogService {
    pub fn new(products: ProductRepository, span: Span) -> Self {
        CatalogService { products, span }
    }

    /// All products in insertion order.
    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        let products = self.products.list_all().await?;
        info!(parent: &self.span, action = "list", count = products.len(), "Listed products");
        Ok(products)
    }

    /// A blank Create form.
    pub fn new_form(&self) -> ProductForm {
        info!(parent: &self.span, action = "new_form", "Rendering create form");
        ProductForm::empty()
    }

    /// Validates and stores a candidate.
    ///
    /// On validation failure nothing is written and the error carries
    /// every failing field.
    pub async fn create(&self, candidate: &CandidateProduct) -> ApiResult<Product> {
        let new_product = match validate_candidate(candidate) {
            Ok(p) => p,
            Err(errors) => {
                warn!(
                    parent: &self.span,
                    action = "create",
                    failed_fields = errors.len(),
                    %errors,
                    "Rejected invalid product"
                );
                return Err(errors.into());
            }
        };

        let product = self.products.insert(&new_product).await?;
        info!(
            parent: &self.span,
            action = "create",
            id = product.id,
            name = %product.name,
            "Product created"
        );
        Ok(product)
    }

    /// Products whose name or description contains `keyword`.
    ///
    /// A missing or whitespace-only keyword is rejected before the store
    /// is touched. Otherwise the keyword is matched verbatim.
    pub async fn search(&self, keyword: Option<&str>) -> ApiResult<Vec<Product>> {
        let keyword = match keyword {
            Some(k) if !k.trim().is_empty() => k,
            _ => {
                warn!(parent: &self.span, action = "search", "Search without a keyword");
                return Err(CoreError::MissingSearchKeyword.into());
            }
        };

        let products = self.products.search(keyword).await?;
        info!(
            parent: &self.span,
            action = "search",
            keyword = %keyword,
            count = products.len(),
            "Searched products"
        );
        Ok(products)
    }

    /// One product by id.
    pub async fn details(&self, id: i64) -> ApiResult<Product> {
        match self.products.get_by_id(id).await? {
            Some(product) => {
                info!(
                    parent: &self.span,
                    action = "details",
                    id,
                    name = %product.name,
                    "Fetched product"
                );
                Ok(product)
            }
            None => {
                warn!(parent: &self.span, action = "details", id, "Product not found");
                Err(CoreError::ProductNotFound(id).into())
            }
        }
    }

    /// Removes a product and returns it.
    pub async fn delete(&self, id: i64) -> ApiResult<Product> {
        match self.products.delete(id).await? {
            Some(product) => {
                info!(
                    parent: &self.span,
                    action = "delete",
                    id,
                    name = %product.name,
                    "Product deleted"
                );
                Ok(product)
            }
            None => {
                warn!(parent: &self.span, action = "delete", id, "Delete of missing product");
                Err(CoreError::ProductNotFound(id).into())
            }
        }
    }
}
