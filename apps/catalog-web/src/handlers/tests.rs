use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::routing;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::antiforgery::{Antiforgery, COOKIE_NAME, FORM_FIELD, HEADER_NAME};
use crate::config::CatalogConfig;
use crate::swagger::OPENAPI_PATH;
use crate::{app, routes, with_middleware, AppState};
use catalog_db::{Database, DbConfig};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

async fn test_state() -> Arc<AppState> {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let antiforgery = Antiforgery::new("test-secret").unwrap();
    Arc::new(AppState::new(db, antiforgery))
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// A browser session: the cookie pair and the token embedded in the form.
struct Session {
    cookie: String,
    token: String,
}

async fn open_session(app: &Router) -> Session {
    let response = get(app, "/Product/Create").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with(COOKIE_NAME));

    let html = body_text(response).await;
    let marker = format!(r#"name="{}" value=""#, FORM_FIELD);
    let start = html.find(&marker).unwrap() + marker.len();
    let end = start + html[start..].find('"').unwrap();

    Session {
        cookie,
        token: html[start..end].to_string(),
    }
}

fn form_body(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

async fn post_form(app: &Router, uri: &str, cookie: Option<&str>, body: String) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

async fn create_product(
    app: &Router,
    session: &Session,
    name: &str,
    description: &str,
    price: &str,
) -> Response {
    let body = form_body(&[
        ("name", name),
        ("description", description),
        ("price", price),
        ("imageUrl", ""),
        (FORM_FIELD, session.token.as_str()),
    ]);
    post_form(app, "/Product/Create", Some(&session.cookie), body).await
}

async fn delete_with_header(app: &Router, session: &Session, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, &session.cookie)
                .header(HEADER_NAME, &session.token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

// =============================================================================
// List / Details
// =============================================================================

#[tokio::test]
async fn it_lists_an_empty_catalog() {
    let app = app(test_state().await);

    for uri in ["/Product", "/Product/Index"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }
}

#[tokio::test]
async fn it_returns_404_for_unknown_or_non_numeric_ids() {
    let app = app(test_state().await);

    let response = get(&app, "/Product/Details/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Product with ID 42 not found.");

    let response = get(&app, "/Product/Details/abc").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/Product/Details").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn it_serves_the_create_form_with_a_session() {
    let app = app(test_state().await);
    let session = open_session(&app).await;
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn it_walks_the_pen_lifecycle() {
    let state = test_state().await;
    let app = app(state.clone());
    let session = open_session(&app).await;

    let response = create_product(&app, &session, "Pen", "Blue ink pen", "1.50").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/Product/Details/1"
    );

    let response = get(&app, "/Product/Details/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let pen = body_json(response).await;
    assert_eq!(
        pen,
        serde_json::json!({
            "id": 1,
            "name": "Pen",
            "description": "Blue ink pen",
            "price": 1.5,
            "imageUrl": null
        })
    );

    let response = get(&app, "/Product/Details?id=1").await;
    assert_eq!(body_json(response).await, pen);

    let response = delete_with_header(&app, &session, "/Product/Delete/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, pen);

    let response = get(&app, "/Product/Details/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_with_header(&app, &session, "/Product/Delete/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn it_rerenders_the_form_on_invalid_input() {
    let state = test_state().await;
    let app = app(state.clone());
    let session = open_session(&app).await;

    let response = create_product(&app, &session, "", "x", "5.00").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("validation-summary"));
    assert!(html.contains("name is required"));
    assert!(html.contains(r#"value="5.00""#));

    assert_eq!(state.db.products().count().await.unwrap(), 0);
}

#[tokio::test]
async fn it_creates_products_whose_text_contains_nul() {
    let app = app(test_state().await);
    let session = open_session(&app).await;

    let response = create_product(&app, &session, "\0Pen", "Blue\0ink", "1.50").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers().get(header::LOCATION).unwrap().to_str().unwrap();

    let product = body_json(get(&app, location).await).await;
    assert_eq!(product["name"], "\0Pen");
    assert_eq!(product["description"], "Blue\0ink");
}

#[tokio::test]
async fn it_reports_every_failing_field() {
    let app = app(test_state().await);
    let session = open_session(&app).await;

    let long_name = "n".repeat(101);
    let response = create_product(&app, &session, &long_name, "", "0.01").await;
    let html = body_text(response).await;

    assert!(html.contains("name must be at most 100 characters"));
    assert!(html.contains("description is required"));
    assert!(html.contains("price must be greater than 0.01"));
}

// =============================================================================
// Anti-forgery
// =============================================================================

#[tokio::test]
async fn it_rejects_create_without_a_cookie() {
    let state = test_state().await;
    let app = app(state.clone());
    let session = open_session(&app).await;

    let body = form_body(&[
        ("name", "Pen"),
        ("description", "Blue ink pen"),
        ("price", "1.50"),
        (FORM_FIELD, session.token.as_str()),
    ]);
    let response = post_form(&app, "/Product/Create", None, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.db.products().count().await.unwrap(), 0);
}

#[tokio::test]
async fn it_rejects_create_with_a_missing_or_wrong_token() {
    let state = test_state().await;
    let app = app(state.clone());
    let session = open_session(&app).await;

    let body = form_body(&[("name", "Pen"), ("description", "Blue ink pen"), ("price", "1.50")]);
    let response = post_form(&app, "/Product/Create", Some(&session.cookie), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let forged = Session {
        cookie: session.cookie.clone(),
        token: Antiforgery::new("attacker").unwrap().token_for("whatever"),
    };
    let response = create_product(&app, &forged, "Pen", "Blue ink pen", "1.50").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.db.products().count().await.unwrap(), 0);
}

#[tokio::test]
async fn it_rejects_delete_without_a_token() {
    let state = test_state().await;
    let app = app(state.clone());
    let session = open_session(&app).await;

    create_product(&app, &session, "Pen", "Blue ink pen", "1.50").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/Product/Delete/1")
                .header(header::COOKIE, &session.cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(state.db.products().count().await.unwrap(), 1);
}

#[tokio::test]
async fn it_accepts_delete_token_in_the_form_body() {
    let app = app(test_state().await);
    let session = open_session(&app).await;

    create_product(&app, &session, "Pen", "Blue ink pen", "1.50").await;

    let body = form_body(&[(FORM_FIELD, session.token.as_str())]);
    let response = post_form(&app, "/Product/Delete?id=1", Some(&session.cookie), body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Pen");
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn it_rejects_blank_search_keywords() {
    let app = app(test_state().await);

    for uri in [
        "/Product/Search",
        "/Product/Search?keyword=",
        "/Product/Search?keyword=%20%20%20",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body_text(response).await, "A search keyword is required.");
    }
}

#[tokio::test]
async fn it_searches_name_and_description_case_sensitively() {
    let app = app(test_state().await);
    let session = open_session(&app).await;

    create_product(&app, &session, "Red Shoe", "Leather", "49.99").await;
    create_product(&app, &session, "Blue Hat", "Wool", "19.99").await;
    create_product(&app, &session, "Scarf", "Red stripes", "15.00").await;

    let found = body_json(get(&app, "/Product/Search?keyword=Red").await).await;
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Red Shoe", "Scarf"]);

    let found = body_json(get(&app, "/Product/Search?keyword=red").await).await;
    assert_eq!(found, serde_json::json!([]));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn it_turns_panics_into_json_500() {
    let state = test_state().await;
    let app = with_middleware(
        routes().route("/boom", routing::get(|| async { panic!("kaboom") as () })),
        state,
    );

    let response = get(&app, "/boom").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, serde_json::json!({ "message": "kaboom" }));
}

#[tokio::test]
async fn it_turns_store_failures_into_json_500() {
    let state = test_state().await;
    let app = app(state.clone());
    state.db.close().await;

    let response = get(&app, "/Product").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["message"].is_string());
}

#[tokio::test]
async fn it_serves_the_openapi_document() {
    let app = app(test_state().await);

    let response = get(&app, OPENAPI_PATH).await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = body_json(response).await;
    assert_eq!(doc["info"]["title"], "Catalog API");
    assert!(doc["paths"]["/Product/Details/{id}"]["get"].is_object());
    assert!(doc["paths"]["/Product/Create"]["post"].is_object());
    assert!(doc["components"]["schemas"]["Product"].is_object());
}

#[tokio::test]
async fn it_hides_swagger_when_disabled() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let antiforgery = Antiforgery::new("test-secret").unwrap();
    let app = app(Arc::new(AppState::new(db, antiforgery).with_swagger(false)));

    let response = get(&app, OPENAPI_PATH).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/Product").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn it_builds_state_from_config() {
    let mut config = CatalogConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.database.connect_timeout_secs = 5;
    config.database.run_migrations = false;
    config.server.swagger = false;
    config.antiforgery.secret = Some("from-config".to_string());

    let state = AppState::from_config(&config).await.unwrap();
    assert!(!state.swagger);
    let token = Antiforgery::new("from-config").unwrap().token_for("session");
    assert!(state.antiforgery.verify("session", &token).is_ok());

    let app = app(Arc::new(state));
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_text(response).await, "Migrations pending");
}

#[tokio::test]
async fn it_reports_health() {
    let state = test_state().await;
    let app = app(state.clone());

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    state.db.close().await;
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
