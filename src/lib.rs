use axum::{Router, extract::FromRef, http::HeaderName, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod repository;

// Per-resource routing modules.
pub mod routes;
use routes::{albums, posts, session};

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point
// and the test suite.
pub use auth::{SessionState, SessionStore};
pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates the OpenAPI documentation for all handlers and schemas. The
/// generated JSON is served at `/api-docs/openapi.json` and rendered by the
/// Swagger UI at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::logout,
        handlers::list_albums, handlers::get_album, handlers::create_album,
        handlers::create_album_with_id, handlers::update_album, handlers::delete_album,
        handlers::list_posts, handlers::get_post, handlers::create_post,
        handlers::create_post_with_id, handlers::update_post, handlers::delete_post,
    ),
    components(
        schemas(
            models::Album, models::PostView, models::LoginRequest,
            models::CreateAlbumRequest, models::UpdateAlbumRequest,
            models::CreatePostRequest, models::UpdatePostRequest,
            models::AlbumPage, models::PostPage, pagination::PageMeta,
        )
    ),
    tags(
        (name = "blog-api", description = "Posts & Albums content API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding all services shared across
/// requests: the persistence layer, the session registry, and the loaded
/// configuration.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: persistence behind the `Repository` trait.
    pub repo: RepositoryState,
    /// Session Layer: the in-process token registry.
    pub sessions: SessionState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors pull individual components out of the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's routing structure, applies the observability
/// layers, and registers the application state. Requests that hit a known
/// path with an unsupported method fall through to a JSON 405, keeping the
/// "every failure is a message body" contract.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Unauthenticated liveness endpoint for monitoring.
        .route("/health", get(|| async { "ok" }))
        .merge(session::session_routes())
        .merge(albums::album_routes())
        .merge(posts::post_routes())
        .method_not_allowed_fallback(|| async { ApiError::MethodNotAllowed })
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation: a unique UUID for every request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing spans correlated by that ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Return the generated x-request-id header to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the `TraceLayer` span so every log line of a request carries
/// the correlation id alongside method and URI.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
