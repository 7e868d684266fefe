use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Post Router Module
///
/// Same layout as the album router: public reads, staff-gated writes on the
/// shared paths.
pub fn post_routes() -> Router<AppState> {
    Router::new()
        // GET /post?page=...&size=...&search=...
        // POST /post
        .route(
            "/post",
            get(handlers::list_posts).post(handlers::create_post),
        )
        // GET /post/{id} — public read, {} when absent.
        // POST /post/{id} — create under a caller-chosen id.
        // PUT /post/{id} — partial merge update.
        // DELETE /post/{id} — unconditional delete.
        .route(
            "/post/{id}",
            get(handlers::get_post)
                .post(handlers::create_post_with_id)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
}
