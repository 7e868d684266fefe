use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::{error::ApiError, repository::RepositoryState};

/// Name of the http-only cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// SessionStore
///
/// In-process session registry mapping opaque tokens to account ids. This is
/// the only shared mutable state owned by the request-handling layer; the
/// lock is held for single map operations only. A restart drops all
/// sessions, which simply forces clients to log in again.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Uuid>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Opens a session for the user and returns the opaque token.
    pub fn open(&self, user_id: Uuid) -> Uuid {
        let token = Uuid::new_v4();
        self.sessions.write().unwrap().insert(token, user_id);
        token
    }

    /// Resolves a token to the account it was opened for.
    pub fn resolve(&self, token: Uuid) -> Option<Uuid> {
        self.sessions.read().unwrap().get(&token).copied()
    }

    /// Invalidates a token. Returns false when it was not an open session.
    pub fn close(&self, token: Uuid) -> bool {
        self.sessions.write().unwrap().remove(&token).is_some()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// SessionState
///
/// The shared handle to the session registry held in the application state.
pub type SessionState = Arc<SessionStore>;

/// AuthUser
///
/// The resolved identity of an authenticated request. Successful extraction
/// is the authentication check; the `is_staff` flag is the authorization
/// check mutating handlers perform on top of it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

/// AuthUser Extractor Implementation
///
/// Reads the session cookie, resolves the token through the session store,
/// and re-loads the account from the repository so a deleted user cannot
/// keep acting through a live token. Any failure along the way rejects the
/// request with 401 and the standard JSON message body.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    SessionState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let sessions = SessionState::from_ref(state);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
            .ok_or(ApiError::NotAuthenticated)?;

        let user_id = sessions.resolve(token).ok_or(ApiError::NotAuthenticated)?;

        let user = repo
            .get_user(user_id)
            .await
            .ok_or(ApiError::NotAuthenticated)?;

        Ok(AuthUser {
            id: user.id,
            username: user.username,
            is_staff: user.is_staff,
        })
    }
}

// --- Password Handling ---

/// Hashes a password with Argon2id for storage as a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(rand::thread_rng());
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verifies a candidate password against a stored hash. A hash that fails to
/// parse counts as a failed verification rather than an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}
