//! OpenAPI document for the catalog routes, served with Swagger UI.

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorBody;
use crate::handlers::{health, product};
use crate::AppState;
use catalog_core::{CandidateProduct, Product};

/// Where the JSON document is served.
pub const OPENAPI_PATH: &str = "/swagger/v1/swagger.json";

/// Where the UI is served.
pub const SWAGGER_UI_PATH: &str = "/swagger";

#[derive(OpenApi)]
#[openapi(
        info(
                title = "Catalog API",
                version = "v1",
        ),
        paths(
                // /Product
                product::index,
                product::new_form,
                product::create,
                product::search,
                product::details,
                product::details_by_query,
                product::delete,
                product::delete_by_query,

                // /health
                health::health_handler,
        ),
        components(
            schemas(Product, CandidateProduct, ErrorBody),
        ),
        tags(
            (name = "product", description = "Product catalog"),
            (name = "health", description = "Service health"),
        )
    )]
pub struct ApiDoc;

/// Swagger UI plus the document it renders.
pub fn router() -> Router<Arc<AppState>> {
    SwaggerUi::new(SWAGGER_UI_PATH)
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}
