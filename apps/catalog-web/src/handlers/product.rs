//! # Product Handlers
//!
//! HTTP entry points for the catalog. Each handler builds a
//! [`CatalogService`](crate::service::CatalogService) for the request and
//! turns its result into JSON, HTML, or a redirect.
//!
//! ## Routes
//! ```text
//! GET  /Product, /Product/Index        → index        200 JSON [Product]
//! GET  /Product/Create                 → new_form     200 HTML
//! POST /Product/Create                 → create       302 → Details | 200 HTML (errors)
//! GET  /Product/Search?keyword=…       → search       200 JSON [Product] | 400
//! GET  /Product/Details/{id}, ?id=…    → details      200 JSON Product | 404
//! POST /Product/Delete/{id},  ?id=…    → delete       200 JSON Product | 404
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::views::{self, ProductForm};
use crate::AppState;
use catalog_core::{CandidateProduct, Product};

/// Query string for Search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

/// Query string for the `?id=` forms of Details and Delete.
#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: Option<String>,
}

/// Lists every product.
#[utoipa::path(
        get,
        path = "/Product",
        tag = "product",
        operation_id = "list_products",
        responses(
            (status = 200, body = Vec<Product>),
            (status = 500, body = ErrorBody),
        )
    )]
pub async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.catalog().list().await?;
    Ok(Json(products))
}

/// Renders the blank Create form and hands out an anti-forgery session.
#[utoipa::path(
        get,
        path = "/Product/Create",
        tag = "product",
        operation_id = "create_form",
        responses(
            (status = 200, description = "Create form with a fresh token",
                body = String, content_type = "text/html"),
        )
    )]
pub async fn new_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let form = state.catalog().new_form();
    render_form(&state, jar, &form)
}

/// Creates a product from a submitted form.
///
/// Invalid input re-renders the form with the submitted values and a
/// message for every failing field.
#[utoipa::path(
        post,
        path = "/Product/Create",
        tag = "product",
        operation_id = "create_product",
        request_body(
            content = CandidateProduct,
            content_type = "application/x-www-form-urlencoded"
        ),
        responses(
            (status = 302, description = "Created; Location is the Details URL"),
            (status = 200, description = "Form re-rendered with errors",
                body = String, content_type = "text/html"),
            (status = 400, description = "Anti-forgery check failed", body = String),
            (status = 500, body = ErrorBody),
        )
    )]
pub async fn create(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(candidate): Form<CandidateProduct>,
) -> ApiResult<Response> {
    match state.catalog().create(&candidate).await {
        Ok(product) => Ok(found(&format!("/Product/Details/{}", product.id))),
        Err(ApiError::Validation(errors)) => {
            let form = ProductForm::rejected(candidate, errors);
            Ok(render_form(&state, jar, &form).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Searches name and description for a keyword.
#[utoipa::path(
        get,
        path = "/Product/Search",
        tag = "product",
        operation_id = "search_products",
        params(
            ("keyword" = Option<String>, Query,
                description = "Case-sensitive substring of name or description"),
        ),
        responses(
            (status = 200, body = Vec<Product>),
            (status = 400, description = "Blank keyword", body = String),
            (status = 500, body = ErrorBody),
        )
    )]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = state.catalog().search(params.keyword.as_deref()).await?;
    Ok(Json(products))
}

/// Fetches one product by path id.
#[utoipa::path(
        get,
        path = "/Product/Details/{id}",
        tag = "product",
        operation_id = "product_details",
        params(
            ("id" = String, Path, description = "Product id"),
        ),
        responses(
            (status = 200, body = Product),
            (status = 404, body = String),
            (status = 500, body = ErrorBody),
        )
    )]
pub async fn details(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&raw_id)?;
    Ok(Json(state.catalog().details(id).await?))
}

/// Fetches one product by `?id=`.
#[utoipa::path(
        get,
        path = "/Product/Details",
        tag = "product",
        operation_id = "product_details_by_query",
        params(
            ("id" = Option<String>, Query, description = "Product id"),
        ),
        responses(
            (status = 200, body = Product),
            (status = 404, body = String),
            (status = 500, body = ErrorBody),
        )
    )]
pub async fn details_by_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdParams>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(params.id.as_deref().unwrap_or("0"))?;
    Ok(Json(state.catalog().details(id).await?))
}

/// Deletes one product by path id and returns it.
#[utoipa::path(
        post,
        path = "/Product/Delete/{id}",
        tag = "product",
        operation_id = "delete_product",
        params(
            ("id" = String, Path, description = "Product id"),
            ("RequestVerificationToken" = Option<String>, Header,
                description = "Anti-forgery token, unless sent as a form field"),
        ),
        responses(
            (status = 200, body = Product),
            (status = 400, description = "Anti-forgery check failed", body = String),
            (status = 404, body = String),
            (status = 500, body = ErrorBody),
        )
    )]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(&raw_id)?;
    Ok(Json(state.catalog().delete(id).await?))
}

/// Deletes one product by `?id=` and returns it.
#[utoipa::path(
        post,
        path = "/Product/Delete",
        tag = "product",
        operation_id = "delete_product_by_query",
        params(
            ("id" = Option<String>, Query, description = "Product id"),
            ("RequestVerificationToken" = Option<String>, Header,
                description = "Anti-forgery token, unless sent as a form field"),
        ),
        responses(
            (status = 200, body = Product),
            (status = 400, description = "Anti-forgery check failed", body = String),
            (status = 404, body = String),
            (status = 500, body = ErrorBody),
        )
    )]
pub async fn delete_by_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdParams>,
) -> ApiResult<Json<Product>> {
    let id = parse_id(params.id.as_deref().unwrap_or("0"))?;
    Ok(Json(state.catalog().delete(id).await?))
}

// =============================================================================
// Helpers
// =============================================================================

/// A non-numeric id names no product.
fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Product with ID {} not found.", raw)))
}

fn render_form(state: &AppState, jar: CookieJar, form: &ProductForm) -> impl IntoResponse {
    let (jar, token) = state.antiforgery.issue(jar);
    (jar, Html(views::create_page(form, &token).into_string()))
}

/// 302 Found to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
