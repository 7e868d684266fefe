use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// The resource a denied mutation was aimed at. Only used to pick the
/// user-facing message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    Album,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Post => write!(f, "post"),
            Resource::Album => write!(f, "album"),
        }
    }
}

/// ApiError
///
/// Every failure path of the API maps onto one of these variants. Each
/// renders as a JSON body with a single `message` field and the matching
/// status code, so clients never see a bare-text error.
///
/// Unknown ids on *read* paths are deliberately not represented here: reads
/// of missing entities answer 200 with an empty object instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// Anonymous caller, dead session token, or a non-staff mutation attempt.
    NotAuthenticated,
    /// Bad credentials or an unreadable login body.
    InvalidLogin,
    /// Logout without an open session.
    NotLoggedIn,
    MethodNotAllowed,
    /// Creation failed: unparseable body, missing required field, or a
    /// duplicate id.
    CreateDenied(Resource),
    /// Update failed: unparseable body, unrecognized key, or an unknown
    /// target id.
    UpdateDenied(Resource),
    /// Deletion of an id that does not exist.
    DeleteDenied(Resource),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotAuthenticated => write!(f, "not authenticated"),
            ApiError::InvalidLogin => write!(f, "invalid login attempt"),
            ApiError::NotLoggedIn => write!(f, "user not logged in"),
            ApiError::MethodNotAllowed => write!(f, "method not allowed"),
            ApiError::CreateDenied(resource) => write!(f, "could not create {}", resource),
            ApiError::UpdateDenied(resource) => write!(f, "could not update {}", resource),
            ApiError::DeleteDenied(resource) => write!(f, "could not delete {}", resource),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated | ApiError::InvalidLogin | ApiError::NotLoggedIn => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::CreateDenied(_) | ApiError::UpdateDenied(_) | ApiError::DeleteDenied(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}
