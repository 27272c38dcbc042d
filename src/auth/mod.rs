use std::sync::Arc;
use std::time::{Duration, Instant};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use dashmap::DashMap;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::AppState;

/// Name of the admin session cookie.
pub const SESSION_COOKIE: &str = "storefront_session";

/// Identity of the authenticated admin, injected into request extensions by
/// [`require_admin`].
#[derive(Clone, Copy, Debug)]
pub struct CurrentAdmin {
    pub admin_user_id: i32,
}

/// Pluggable session storage: the request handlers only ever see this
/// capability surface, so the backend can be swapped without touching them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolves a session token to the admin user id, if the session is live.
    async fn get(&self, token: &str) -> Option<i32>;
    /// Creates a session for the given admin and returns the opaque token.
    async fn create(&self, admin_user_id: i32) -> String;
    /// Destroys the session for the given token. Destroying an unknown token
    /// is a no-op.
    async fn destroy(&self, token: &str);
}

struct SessionEntry {
    admin_user_id: i32,
    expires_at: Instant,
}

/// In-memory session store with a fixed TTL per session.
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, token: &str) -> Option<i32> {
        let expired = match self.sessions.get(token) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Some(entry.admin_user_id);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sessions.remove(token);
        }
        None
    }

    async fn create(&self, admin_user_id: i32) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                admin_user_id,
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    async fn destroy(&self, token: &str) {
        self.sessions.remove(token);
    }
}

/// Hashes a password with Argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Extracts the session cookie value from a raw `Cookie` header.
pub fn session_token_from_headers(headers: &header::HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Builds the `Set-Cookie` value for a freshly created session.
pub fn session_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.as_secs()
    )
}

/// Builds the `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

/// Admin session gate guarding catalog mutation, reporting, and admin survey
/// listing. API-style callers get a JSON 401; browser navigation gets a
/// redirect to the login page, distinguished by path prefix and content type.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = session_token_from_headers(request.headers()) {
        if let Some(admin_user_id) = state.sessions.get(&token).await {
            request
                .extensions_mut()
                .insert(CurrentAdmin { admin_user_id });
            return next.run(request).await;
        }
    }

    debug!(path = %request.uri().path(), "Rejected unauthenticated request");

    let wants_json = request.uri().path().starts_with("/api")
        || request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

    if wants_json {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "No autorizado" })),
        )
            .into_response()
    } else {
        Redirect::to("/admin/login").into_response()
    }
}

/// Shared handle used by handlers and middleware.
pub type SharedSessionStore = Arc<dyn SessionStore>;
