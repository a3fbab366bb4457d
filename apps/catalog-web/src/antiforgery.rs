//! # Anti-forgery Tokens
//!
//! Session-bound tokens that every state-changing request must carry.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Anti-forgery Round Trip                            │
//! │                                                                         │
//! │  GET /Product/Create                                                   │
//! │       │  no catalog.antiforgery cookie? issue one (random session id)  │
//! │       ▼                                                                 │
//! │  form carries __RequestVerificationToken =                             │
//! │       base64url(HMAC-SHA256(secret, session_id))                       │
//! │       │                                                                 │
//! │  POST /Product/Create  (cookie + token)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  require_token: recompute HMAC from cookie, constant-time compare      │
//! │       ├── ok       → handler runs                                      │
//! │       └── mismatch → 400, handler never runs                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The token can also be sent in the `RequestVerificationToken` header,
//! which is how JSON clients call Delete.

use std::sync::Arc;

use axum::body::{self, Body};
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Cookie holding the session id.
pub const COOKIE_NAME: &str = "catalog.antiforgery";

/// Form field carrying the token.
pub const FORM_FIELD: &str = "__RequestVerificationToken";

/// Header carrying the token.
pub const HEADER_NAME: &str = "RequestVerificationToken";

/// Largest form body buffered while looking for the token.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Anti-forgery failures. All of them map to 400.
#[derive(Debug, Error)]
pub enum AntiforgeryError {
    #[error("the anti-forgery cookie is missing")]
    MissingCookie,

    #[error("the anti-forgery token is missing")]
    MissingToken,

    #[error("the anti-forgery token is invalid")]
    InvalidToken,

    #[error("the anti-forgery secret is unusable")]
    InvalidSecret,
}

/// Issues and verifies session tokens.
///
/// Cloning shares the keyed HMAC state.
#[derive(Clone)]
pub struct Antiforgery {
    mac: Arc<HmacSha256>,
}

impl std::fmt::Debug for Antiforgery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Antiforgery").finish_non_exhaustive()
    }
}

impl Antiforgery {
    /// Creates a token service keyed with `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, AntiforgeryError> {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|_| AntiforgeryError::InvalidSecret)?;
        Ok(Antiforgery { mac: Arc::new(mac) })
    }

    /// Creates a token service with a fresh random 32-byte key.
    pub fn random() -> Result<Self, AntiforgeryError> {
        let mut secret = Vec::with_capacity(32);
        secret.extend_from_slice(Uuid::new_v4().as_bytes());
        secret.extend_from_slice(Uuid::new_v4().as_bytes());
        Self::new(secret)
    }

    /// Token for the given session id.
    pub fn token_for(&self, session_id: &str) -> String {
        let mut mac = (*self.mac).clone();
        mac.update(session_id.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Checks `token` against the session id in constant time.
    pub fn verify(&self, session_id: &str, token: &str) -> Result<(), AntiforgeryError> {
        let expected = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| AntiforgeryError::InvalidToken)?;

        let mut mac = (*self.mac).clone();
        mac.update(session_id.as_bytes());
        mac.verify_slice(&expected)
            .map_err(|_| AntiforgeryError::InvalidToken)
    }

    /// Ensures the jar holds a session cookie and returns the matching token.
    pub fn issue(&self, jar: CookieJar) -> (CookieJar, String) {
        if let Some(session) = jar.get(COOKIE_NAME) {
            let token = self.token_for(session.value());
            return (jar, token);
        }

        let session_id = Uuid::new_v4().simple().to_string();
        let token = self.token_for(&session_id);
        debug!("Issued anti-forgery session");

        let cookie = Cookie::build((COOKIE_NAME, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .build();

        (jar.add(cookie), token)
    }
}

/// Middleware guarding state-changing requests.
///
/// Safe methods pass through untouched. For anything else the session
/// cookie must be present and the token (header first, then form field)
/// must match it.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_safe_method(request.method()) {
        return Ok(next.run(request).await);
    }

    let session_id = jar
        .get(COOKIE_NAME)
        .map(|c| c.value().to_string())
        .ok_or(AntiforgeryError::MissingCookie)?;

    let header_token = request
        .headers()
        .get(HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let request = match header_token {
        Some(token) => {
            state.antiforgery.verify(&session_id, &token)?;
            request
        }
        None => {
            let (parts, body) = request.into_parts();
            let bytes = body::to_bytes(body, MAX_FORM_BYTES)
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;

            let token = form_token(&bytes).ok_or(AntiforgeryError::MissingToken)?;
            state.antiforgery.verify(&session_id, &token)?;

            Request::from_parts(parts, Body::from(bytes))
        }
    };

    Ok(next.run(request).await)
}

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Pulls the token out of a urlencoded form body.
fn form_token(body: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == FORM_FIELD)
        .map(|(_, value)| value.into_owned())
}
