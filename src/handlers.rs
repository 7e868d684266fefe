use crate::{
    AppState,
    auth::{self, AuthUser, SESSION_COOKIE},
    error::{ApiError, Resource},
    models::{
        Album, AlbumPage, CreateAlbumRequest, CreatePostRequest, LoginRequest, PostPage,
        PostView, UpdateAlbumRequest, UpdatePostRequest,
    },
    pagination::{self, ListQuery},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use serde_json::{Value, json};
use uuid::Uuid;

// --- Session Handlers ---

/// login
///
/// [Public Route] Validates credentials against the stored account and opens
/// a session carried by an http-only cookie. Every failure mode of the body
/// or the credential check collapses into the same 401, so the response does
/// not reveal whether the username exists.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let Json(credentials) = body.map_err(|_| ApiError::InvalidLogin)?;

    let user = state
        .repo
        .get_user_by_username(&credentials.username)
        .await
        .ok_or(ApiError::InvalidLogin)?;

    if !auth::verify_password(&credentials.password, &user.password_hash) {
        return Err(ApiError::InvalidLogin);
    }

    // A re-login replaces any session the caller already holds.
    if let Some(previous) = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    {
        state.sessions.close(previous);
    }

    let token = state.sessions.open(user.id);
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), Json(json!({ "message": "user logged in" }))))
}

/// logout
///
/// [Session Route] Ends the caller's session. Any method is accepted except
/// DELETE, which is rejected with 405 — a guard kept from the original API
/// surface. Without an open session the request fails with 401 before the
/// method is even considered.
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Session ended"),
        (status = 401, description = "No open session"),
        (status = 405, description = "DELETE is not accepted")
    )
)]
pub async fn logout(
    method: Method,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .filter(|token| state.sessions.resolve(*token).is_some())
        .ok_or(ApiError::NotLoggedIn)?;

    if method == Method::DELETE {
        return Err(ApiError::MethodNotAllowed);
    }

    state.sessions.close(token);

    let expired = Cookie::build(SESSION_COOKIE).path("/").build();
    Ok((
        jar.remove(expired),
        Json(json!({ "message": "user logged out" })),
    ))
}

// --- Album Handlers ---

/// list_albums
///
/// [Public Route] Lists albums newest first, optionally filtered by the
/// search term, cut to the requested page. A store failure degrades to an
/// empty collection rather than an error response.
#[utoipa::path(
    get,
    path = "/album",
    params(ListQuery),
    responses((status = 200, description = "Paged albums", body = AlbumPage))
)]
pub async fn list_albums(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<AlbumPage> {
    let albums = state.repo.list_albums(query.search.clone()).await;
    let (page_albums, page) = pagination::paginate(albums, query.page(), query.size());
    Json(AlbumPage {
        page,
        albums: page_albums,
    })
}

/// get_album
///
/// [Public Route] Single album by id. An unknown id answers 200 with an
/// empty object; unknown reads are not hard errors on this API.
#[utoipa::path(
    get,
    path = "/album/{id}",
    params(("id" = String, Path, description = "Album ID")),
    responses((status = 200, description = "Album record, or {} when absent", body = Album))
)]
pub async fn get_album(State(state): State<AppState>, Path(album_id): Path<String>) -> Response {
    match state.repo.get_album(&album_id).await {
        Some(album) => Json(album).into_response(),
        None => Json(json!({})).into_response(),
    }
}

/// create_album
///
/// [Staff Route] Creates an album under a server-generated id.
#[utoipa::path(
    post,
    path = "/album",
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Created", body = Album),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn create_album(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<CreateAlbumRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Album>), ApiError> {
    create_album_with_id(user, State(state), Path(Uuid::new_v4().to_string()), body).await
}

/// create_album_with_id
///
/// [Staff Route] Creates an album under a caller-chosen id. A taken id
/// denies the creation; the existing record is never overwritten.
#[utoipa::path(
    post,
    path = "/album/{id}",
    params(("id" = String, Path, description = "Album ID")),
    request_body = CreateAlbumRequest,
    responses(
        (status = 201, description = "Created", body = Album),
        (status = 400, description = "Invalid body or duplicate id"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn create_album_with_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    body: Result<Json<CreateAlbumRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Album>), ApiError> {
    if !user.is_staff {
        return Err(ApiError::NotAuthenticated);
    }
    let Json(payload) = body.map_err(|_| ApiError::CreateDenied(Resource::Album))?;

    match state.repo.create_album(album_id, payload).await {
        Some(album) => Ok((StatusCode::CREATED, Json(album))),
        None => Err(ApiError::CreateDenied(Resource::Album)),
    }
}

/// update_album
///
/// [Staff Route] Merge-updates an album. The payload type rejects any
/// unrecognized key before a single field is applied, and an empty body is
/// a successful no-op returning the unchanged record.
#[utoipa::path(
    put,
    path = "/album/{id}",
    params(("id" = String, Path, description = "Album ID")),
    request_body = UpdateAlbumRequest,
    responses(
        (status = 200, description = "Updated", body = Album),
        (status = 400, description = "Unknown key or unknown id"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn update_album(
    user: AuthUser,
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    body: Result<Json<UpdateAlbumRequest>, JsonRejection>,
) -> Result<Json<Album>, ApiError> {
    if !user.is_staff {
        return Err(ApiError::NotAuthenticated);
    }
    let Json(payload) = body.map_err(|_| ApiError::UpdateDenied(Resource::Album))?;

    match state.repo.update_album(&album_id, payload).await {
        Some(album) => Ok(Json(album)),
        None => Err(ApiError::UpdateDenied(Resource::Album)),
    }
}

/// delete_album
///
/// [Staff Route] Unconditionally deletes an existing album. Posts linking to
/// it survive with their reference cleared.
#[utoipa::path(
    delete,
    path = "/album/{id}",
    params(("id" = String, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Unknown id"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn delete_album(
    user: AuthUser,
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !user.is_staff {
        return Err(ApiError::NotAuthenticated);
    }
    if state.repo.delete_album(&album_id).await {
        Ok(Json(json!({ "message": "album deleted" })))
    } else {
        Err(ApiError::DeleteDenied(Resource::Album))
    }
}

// --- Post Handlers ---

/// list_posts
///
/// [Public Route] Lists posts newest first with search and pagination, the
/// same contract as the album listing.
#[utoipa::path(
    get,
    path = "/post",
    params(ListQuery),
    responses((status = 200, description = "Paged posts", body = PostPage))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<PostPage> {
    let posts = state.repo.list_posts(query.search.clone()).await;
    let (page_posts, page) = pagination::paginate(posts, query.page(), query.size());
    Json(PostPage {
        page,
        posts: page_posts.into_iter().map(PostView::from).collect(),
    })
}

/// get_post
///
/// [Public Route] Single post by id, or {} with 200 when absent.
#[utoipa::path(
    get,
    path = "/post/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses((status = 200, description = "Post record, or {} when absent", body = PostView))
)]
pub async fn get_post(State(state): State<AppState>, Path(post_id): Path<String>) -> Response {
    match state.repo.get_post(&post_id).await {
        Some(post) => Json(PostView::from(post)).into_response(),
        None => Json(json!({})).into_response(),
    }
}

/// create_post
///
/// [Staff Route] Creates a post under a server-generated id. The
/// authenticated account becomes the owner.
#[utoipa::path(
    post,
    path = "/post",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = PostView),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn create_post(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
    create_post_with_id(user, State(state), Path(Uuid::new_v4().to_string()), body).await
}

/// create_post_with_id
///
/// [Staff Route] Creates a post under a caller-chosen id; duplicate ids deny
/// the creation. An album reference that does not resolve leaves the post
/// unlinked without failing the request.
#[utoipa::path(
    post,
    path = "/post/{id}",
    params(("id" = String, Path, description = "Post ID")),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = PostView),
        (status = 400, description = "Invalid body or duplicate id"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn create_post_with_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
    if !user.is_staff {
        return Err(ApiError::NotAuthenticated);
    }
    let Json(payload) = body.map_err(|_| ApiError::CreateDenied(Resource::Post))?;

    match state.repo.create_post(post_id, payload, user.id).await {
        Some(post) => Ok((StatusCode::CREATED, Json(PostView::from(post)))),
        None => Err(ApiError::CreateDenied(Resource::Post)),
    }
}

/// update_post
///
/// [Staff Route] Merge-updates a post, all-or-nothing on unrecognized keys.
/// A supplied album id is re-resolved; when it does not resolve the existing
/// link stays untouched.
#[utoipa::path(
    put,
    path = "/post/{id}",
    params(("id" = String, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = PostView),
        (status = 400, description = "Unknown key or unknown id"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn update_post(
    user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    body: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<PostView>, ApiError> {
    if !user.is_staff {
        return Err(ApiError::NotAuthenticated);
    }
    let Json(payload) = body.map_err(|_| ApiError::UpdateDenied(Resource::Post))?;

    match state.repo.update_post(&post_id, payload).await {
        Some(post) => Ok(Json(PostView::from(post))),
        None => Err(ApiError::UpdateDenied(Resource::Post)),
    }
}

/// delete_post
///
/// [Staff Route] Unconditionally deletes an existing post.
#[utoipa::path(
    delete,
    path = "/post/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Unknown id"),
        (status = 401, description = "Staff required")
    )
)]
pub async fn delete_post(
    user: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !user.is_staff {
        return Err(ApiError::NotAuthenticated);
    }
    if state.repo.delete_post(&post_id).await {
        Ok(Json(json!({ "message": "post deleted" })))
    } else {
        Err(ApiError::DeleteDenied(Resource::Post))
    }
}
