use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{any, post},
};

/// Session Router Module
///
/// Login and logout. Login is POST-only (other methods land on the router's
/// 405 fallback); logout accepts any method so the handler itself can apply
/// the legacy DELETE guard after the session check.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        // POST /login
        // Validates credentials and opens a cookie-backed session.
        .route("/login", post(handlers::login))
        // /logout (any method)
        // Ends the session. The handler rejects DELETE with 405 and an
        // unauthenticated caller with 401.
        .route("/logout", any(handlers::logout))
}
