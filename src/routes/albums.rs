use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Album Router Module
///
/// Reads are public; create, update, and delete require staff and enforce it
/// inside the handlers, since the id-qualified path mixes both tiers.
pub fn album_routes() -> Router<AppState> {
    Router::new()
        // GET /album?page=...&size=...&search=...
        // POST /album
        .route(
            "/album",
            get(handlers::list_albums).post(handlers::create_album),
        )
        // GET /album/{id} — public read, {} when absent.
        // POST /album/{id} — create under a caller-chosen id.
        // PUT /album/{id} — partial merge update.
        // DELETE /album/{id} — unconditional delete.
        .route(
            "/album/{id}",
            get(handlers::get_album)
                .post(handlers::create_album_with_id)
                .put(handlers::update_album)
                .delete(handlers::delete_album),
        )
}
