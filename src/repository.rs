use crate::models::{
    Album, CreateAlbumRequest, CreatePostRequest, Post, UpdateAlbumRequest, UpdatePostRequest,
    User,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers only ever
/// talk to this trait, so the Postgres implementation can be swapped for the
/// in-memory one in tests without touching any request logic.
///
/// Conventions shared by both implementations:
/// - Listings are ordered by `created` descending, newest first, with and
///   without a search term. Search is a case-insensitive substring match
///   OR-combined over a fixed field set per resource.
/// - Creation returns None when the id is already taken; an existing record
///   is never overwritten.
/// - Updates merge only the supplied fields and return None when the target
///   id does not resolve.
/// - A post's album link is only ever set to an album that exists at that
///   moment; an unresolvable reference is dropped silently (create) or
///   leaves the current link untouched (update).
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Albums ---
    async fn list_albums(&self, search: Option<String>) -> Vec<Album>;
    async fn get_album(&self, id: &str) -> Option<Album>;
    async fn create_album(&self, id: String, req: CreateAlbumRequest) -> Option<Album>;
    async fn update_album(&self, id: &str, req: UpdateAlbumRequest) -> Option<Album>;
    // Returns true only if a row was actually removed. Dependent posts keep
    // existing with their link cleared.
    async fn delete_album(&self, id: &str) -> bool;

    // --- Posts ---
    async fn list_posts(&self, search: Option<String>) -> Vec<Post>;
    async fn get_post(&self, id: &str) -> Option<Post>;
    async fn create_post(&self, id: String, req: CreatePostRequest, user_id: Uuid)
    -> Option<Post>;
    async fn update_post(&self, id: &str, req: UpdatePostRequest) -> Option<Post>;
    async fn delete_post(&self, id: &str) -> bool;

    // --- Accounts ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn get_user_by_username(&self, username: &str) -> Option<User>;
    async fn create_user(&self, user: User) -> Option<User>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

// SQL fragments shared by the post queries: every read goes through the
// owner join so the username is resolved in the same round-trip.
const POST_SELECT: &str = "SELECT p.id, p.user_id, u.username AS username, p.title, p.content, \
     p.created, p.image_urls, p.video_urls, p.album_id \
     FROM posts p \
     LEFT JOIN users u ON p.user_id = u.id";

const ALBUM_SELECT: &str =
    "SELECT id, title, description, image_url, created, reference FROM albums";

/// Escapes LIKE wildcards in a user-supplied term and wraps it for a
/// substring match.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// PostgresRepository
///
/// The production implementation, backed by PostgreSQL. Read failures are
/// logged and degrade to empty results rather than surfacing as request
/// errors; uniqueness and weak-reference clearing lean on the schema
/// (`ON CONFLICT DO NOTHING`, `ON DELETE SET NULL`).
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// Search OR-matches id, title, description, imageURL, the timestamp
    /// rendered as text, and the legacy reference column.
    async fn list_albums(&self, search: Option<String>) -> Vec<Album> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(ALBUM_SELECT);

        if let Some(term) = search {
            let pattern = like_pattern(&term);
            builder.push(" WHERE (id ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR image_url ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR created::text ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR reference ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY created DESC");

        match builder.build_query_as::<Album>().fetch_all(&self.pool).await {
            Ok(albums) => albums,
            Err(e) => {
                tracing::error!("list_albums error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_album(&self, id: &str) -> Option<Album> {
        sqlx::query_as::<_, Album>(&format!("{} WHERE id = $1", ALBUM_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_album error: {:?}", e);
                None
            })
    }

    async fn create_album(&self, id: String, req: CreateAlbumRequest) -> Option<Album> {
        sqlx::query_as::<_, Album>(
            "INSERT INTO albums (id, title, description, image_url) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO NOTHING \
             RETURNING id, title, description, image_url, created, reference",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.image_url)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_album error: {:?}", e);
            None
        })
    }

    /// Merge update via COALESCE: only supplied fields replace the stored
    /// column values.
    async fn update_album(&self, id: &str, req: UpdateAlbumRequest) -> Option<Album> {
        sqlx::query_as::<_, Album>(
            "UPDATE albums SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                image_url = COALESCE($4, image_url) \
             WHERE id = $1 \
             RETURNING id, title, description, image_url, created, reference",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.image_url)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("update_album error: {:?}", e);
            None
        })
    }

    async fn delete_album(&self, id: &str) -> bool {
        match sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_album error: {:?}", e);
                false
            }
        }
    }

    /// Search OR-matches id, title, the owner's username, content, the URL
    /// lists flattened to text, the linked album's title, and the timestamp
    /// rendered as text.
    async fn list_posts(&self, search: Option<String>) -> Vec<Post> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("{} LEFT JOIN albums a ON p.album_id = a.id", POST_SELECT));

        if let Some(term) = search {
            let pattern = like_pattern(&term);
            builder.push(" WHERE (p.id ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR u.username ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.content ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR array_to_string(p.image_urls, ' ') ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR array_to_string(p.video_urls, ' ') ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR a.title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR p.created::text ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        builder.push(" ORDER BY p.created DESC");

        match builder.build_query_as::<Post>().fetch_all(&self.pool).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("list_posts error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_post(&self, id: &str) -> Option<Post> {
        sqlx::query_as::<_, Post>(&format!("{} WHERE p.id = $1", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("get_post error: {:?}", e);
                None
            })
    }

    async fn create_post(
        &self,
        id: String,
        req: CreatePostRequest,
        user_id: Uuid,
    ) -> Option<Post> {
        // The album link only sticks when the referenced album exists at
        // this moment; otherwise the post is created unlinked.
        let album_id = match req.album {
            Some(ref album_ref) => self.get_album(album_ref).await.map(|album| album.id),
            None => None,
        };

        let inserted = sqlx::query(
            "INSERT INTO posts (id, user_id, title, content, image_urls, video_urls, album_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&id)
        .bind(user_id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.image_urls.unwrap_or_default())
        .bind(req.video_urls.unwrap_or_default())
        .bind(album_id)
        .execute(&self.pool)
        .await;

        match inserted {
            // Re-read through the join so the returned record carries the
            // owner's username.
            Ok(res) if res.rows_affected() > 0 => self.get_post(&id).await,
            Ok(_) => None,
            Err(e) => {
                tracing::error!("create_post error: {:?}", e);
                None
            }
        }
    }

    async fn update_post(&self, id: &str, req: UpdatePostRequest) -> Option<Post> {
        // An unresolvable album reference keeps the existing link: the
        // resolved value stays NULL and COALESCE leaves the column alone.
        let album_id = match req.album {
            Some(ref album_ref) => self.get_album(album_ref).await.map(|album| album.id),
            None => None,
        };

        let updated = sqlx::query(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                image_urls = COALESCE($4, image_urls), \
                video_urls = COALESCE($5, video_urls), \
                album_id = COALESCE($6, album_id) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.image_urls)
        .bind(req.video_urls)
        .bind(album_id)
        .execute(&self.pool)
        .await;

        match updated {
            Ok(res) if res.rows_affected() > 0 => self.get_post(id).await,
            Ok(_) => None,
            Err(e) => {
                tracing::error!("update_post error: {:?}", e);
                None
            }
        }
    }

    async fn delete_post(&self, id: &str) -> bool {
        match sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_post error: {:?}", e);
                false
            }
        }
    }

    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_staff FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user error: {:?}", e);
            None
        })
    }

    async fn get_user_by_username(&self, username: &str) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_staff FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user_by_username error: {:?}", e);
            None
        })
    }

    async fn create_user(&self, user: User) -> Option<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, password_hash, is_staff) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (username) DO NOTHING \
             RETURNING id, username, password_hash, is_staff",
        )
        .bind(user.id)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.is_staff)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("create_user error: {:?}", e);
            None
        })
    }
}

// --- In-Memory Implementation ---

#[derive(Default)]
struct MemoryTables {
    users: HashMap<Uuid, User>,
    albums: HashMap<String, Album>,
    posts: HashMap<String, Post>,
}

/// MemoryRepository
///
/// A lock-guarded in-process implementation with the same observable
/// semantics as the Postgres one, including ordering, search, duplicate-id
/// rejection, and weak-reference clearing on album deletion. It backs the
/// test suite and is handy for running the server without a database.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<MemoryTables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn album_matches(album: &Album, term: &str) -> bool {
    contains_ci(&album.id, term)
        || contains_ci(&album.title, term)
        || contains_ci(&album.description, term)
        || album
            .image_url
            .as_deref()
            .is_some_and(|url| contains_ci(url, term))
        || contains_ci(&album.created.to_rfc3339(), term)
        || album
            .reference
            .as_deref()
            .is_some_and(|reference| contains_ci(reference, term))
}

fn post_matches(post: &Post, album_title: Option<&str>, term: &str) -> bool {
    contains_ci(&post.id, term)
        || contains_ci(&post.title, term)
        || post
            .username
            .as_deref()
            .is_some_and(|username| contains_ci(username, term))
        || contains_ci(&post.content, term)
        || post.image_urls.iter().any(|url| contains_ci(url, term))
        || post.video_urls.iter().any(|url| contains_ci(url, term))
        || album_title.is_some_and(|title| contains_ci(title, term))
        || contains_ci(&post.created.to_rfc3339(), term)
}

impl MemoryTables {
    // Rebuilds the owner join the SQL queries perform.
    fn resolve_post(&self, post: &Post) -> Post {
        let mut resolved = post.clone();
        resolved.username = post
            .user_id
            .and_then(|user_id| self.users.get(&user_id))
            .map(|user| user.username.clone());
        resolved
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_albums(&self, search: Option<String>) -> Vec<Album> {
        let tables = self.tables.read().unwrap();
        let mut albums: Vec<Album> = tables
            .albums
            .values()
            .filter(|album| match search.as_deref() {
                Some(term) => album_matches(album, term),
                None => true,
            })
            .cloned()
            .collect();
        albums.sort_by(|a, b| b.created.cmp(&a.created));
        albums
    }

    async fn get_album(&self, id: &str) -> Option<Album> {
        self.tables.read().unwrap().albums.get(id).cloned()
    }

    async fn create_album(&self, id: String, req: CreateAlbumRequest) -> Option<Album> {
        let mut tables = self.tables.write().unwrap();
        if tables.albums.contains_key(&id) {
            return None;
        }
        let album = Album {
            id: id.clone(),
            title: req.title,
            description: req.description,
            image_url: req.image_url,
            created: Utc::now(),
            reference: None,
        };
        tables.albums.insert(id, album.clone());
        Some(album)
    }

    async fn update_album(&self, id: &str, req: UpdateAlbumRequest) -> Option<Album> {
        let mut tables = self.tables.write().unwrap();
        let album = tables.albums.get_mut(id)?;
        if let Some(title) = req.title {
            album.title = title;
        }
        if let Some(description) = req.description {
            album.description = description;
        }
        if let Some(image_url) = req.image_url {
            album.image_url = Some(image_url);
        }
        Some(album.clone())
    }

    async fn delete_album(&self, id: &str) -> bool {
        let mut tables = self.tables.write().unwrap();
        if tables.albums.remove(id).is_none() {
            return false;
        }
        // Weak references: dependent posts survive with the link cleared.
        for post in tables.posts.values_mut() {
            if post.album_id.as_deref() == Some(id) {
                post.album_id = None;
            }
        }
        true
    }

    async fn list_posts(&self, search: Option<String>) -> Vec<Post> {
        let tables = self.tables.read().unwrap();
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .map(|post| tables.resolve_post(post))
            .filter(|post| match search.as_deref() {
                Some(term) => {
                    let album_title = post
                        .album_id
                        .as_deref()
                        .and_then(|album_id| tables.albums.get(album_id))
                        .map(|album| album.title.as_str());
                    post_matches(post, album_title, term)
                }
                None => true,
            })
            .collect();
        posts.sort_by(|a, b| b.created.cmp(&a.created));
        posts
    }

    async fn get_post(&self, id: &str) -> Option<Post> {
        let tables = self.tables.read().unwrap();
        tables.posts.get(id).map(|post| tables.resolve_post(post))
    }

    async fn create_post(
        &self,
        id: String,
        req: CreatePostRequest,
        user_id: Uuid,
    ) -> Option<Post> {
        let mut tables = self.tables.write().unwrap();
        if tables.posts.contains_key(&id) {
            return None;
        }
        let album_id = req
            .album
            .filter(|album_ref| tables.albums.contains_key(album_ref));
        let post = Post {
            id: id.clone(),
            user_id: Some(user_id),
            username: None,
            title: req.title,
            content: req.content,
            created: Utc::now(),
            image_urls: req.image_urls.unwrap_or_default(),
            video_urls: req.video_urls.unwrap_or_default(),
            album_id,
        };
        tables.posts.insert(id.clone(), post);
        let stored = tables.posts.get(&id)?;
        Some(tables.resolve_post(stored))
    }

    async fn update_post(&self, id: &str, req: UpdatePostRequest) -> Option<Post> {
        let mut tables = self.tables.write().unwrap();
        let album_id = req
            .album
            .as_deref()
            .filter(|album_ref| tables.albums.contains_key(*album_ref))
            .map(str::to_string);
        let post = tables.posts.get_mut(id)?;
        if let Some(title) = req.title {
            post.title = title;
        }
        if let Some(content) = req.content {
            post.content = content;
        }
        if let Some(image_urls) = req.image_urls {
            post.image_urls = image_urls;
        }
        if let Some(video_urls) = req.video_urls {
            post.video_urls = video_urls;
        }
        if let Some(album_id) = album_id {
            post.album_id = Some(album_id);
        }
        let updated = post.clone();
        Some(tables.resolve_post(&updated))
    }

    async fn delete_post(&self, id: &str) -> bool {
        self.tables.write().unwrap().posts.remove(id).is_some()
    }

    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.tables.read().unwrap().users.get(&id).cloned()
    }

    async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.tables
            .read()
            .unwrap()
            .users
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    async fn create_user(&self, user: User) -> Option<User> {
        let mut tables = self.tables.write().unwrap();
        if tables
            .users
            .values()
            .any(|existing| existing.username == user.username)
        {
            return None;
        }
        tables.users.insert(user.id, user.clone());
        Some(user)
    }
}
