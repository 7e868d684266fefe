use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::pagination::PageMeta;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// An account record from the `users` table. Only resolved during
/// authentication and never serialized onto the wire, so the password hash
/// stays internal.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    /// Unique login name; doubles as the display identity rendered on posts.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Grants write access to all resources.
    pub is_staff: bool,
}

/// Album
///
/// An album record from the `albums` table. Serializes directly as the API
/// record: the legacy `reference` column is searchable but never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    /// Set by the database at insert time, write-once.
    #[ts(type = "string")]
    pub created: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub reference: Option<String>,
}

/// Post
///
/// A post row joined with its owner's username. The owner and album columns
/// are weak references: both survive deletion of their referent with the
/// link set to NULL.
#[derive(Debug, Clone, FromRow, Default)]
pub struct Post {
    pub id: String,
    pub user_id: Option<Uuid>,
    /// Loaded via a LEFT JOIN on `users`; None once the account is gone.
    #[sqlx(default)]
    pub username: Option<String>,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub album_id: Option<String>,
}

/// PostView
///
/// The wire shape of a post. The weak references are resolved once when the
/// view is built: a cleared owner renders as the `anonymous` placeholder and
/// a cleared album link as null.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PostView {
    pub id: String,
    pub user: String,
    pub title: String,
    pub content: String,
    #[ts(type = "string")]
    pub created: DateTime<Utc>,
    #[serde(rename = "imageURLs")]
    pub image_urls: Vec<String>,
    #[serde(rename = "videoURLs")]
    pub video_urls: Vec<String>,
    pub album: Option<String>,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        PostView {
            id: post.id,
            user: post.username.unwrap_or_else(|| "anonymous".to_string()),
            title: post.title,
            content: post.content,
            created: post.created,
            image_urls: post.image_urls,
            video_urls: post.video_urls,
            album: post.album_id,
        }
    }
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Credentials for POST /login. Anything that fails to parse into this shape
/// is treated as a failed login attempt, not a malformed-request error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// CreateAlbumRequest
///
/// Input payload for album creation. Unknown keys are ignored on create;
/// only updates enforce the allow-list.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateAlbumRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

/// UpdateAlbumRequest
///
/// Partial update payload for PUT /album/{id}. `deny_unknown_fields` rejects
/// the whole body on any unrecognized key before a single field is applied,
/// so a denied update never leaves the record half-merged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct UpdateAlbumRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// CreatePostRequest
///
/// Input payload for post creation. The owner is never caller-supplied; it
/// is taken from the authenticated session. An `album` id that does not
/// resolve leaves the post unlinked without failing the request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "imageURLs")]
    pub image_urls: Option<Vec<String>>,
    #[serde(rename = "videoURLs")]
    pub video_urls: Option<Vec<String>>,
    pub album: Option<String>,
}

/// UpdatePostRequest
///
/// Partial update payload for PUT /post/{id}, all-or-nothing like the album
/// variant. A supplied `album` id is re-resolved by lookup; when it does not
/// resolve, the existing link stays untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(rename = "imageURLs", skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,

    #[serde(rename = "videoURLs", skip_serializing_if = "Option::is_none")]
    pub video_urls: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

// --- List Responses (Output Schemas) ---

/// AlbumPage
///
/// Output schema for GET /album: page metadata plus the album records on
/// that page, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AlbumPage {
    pub page: PageMeta,
    pub albums: Vec<Album>,
}

/// PostPage
///
/// Output schema for GET /post.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PostPage {
    pub page: PageMeta,
    pub posts: Vec<PostView>,
}
