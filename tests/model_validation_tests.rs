use blog_api::models::{
    Album, CreateAlbumRequest, CreatePostRequest, LoginRequest, Post, PostView,
    UpdateAlbumRequest, UpdatePostRequest,
};
use serde_json::json;

// Wire-shape checks: serde renames, the update allow-lists, and the
// weak-reference resolution into the post view.

#[test]
fn test_album_serializes_with_wire_names() {
    let album = Album {
        id: "a1".to_string(),
        title: "T".to_string(),
        description: "D".to_string(),
        image_url: Some("https://example.com/a.jpg".to_string()),
        reference: Some("legacy".to_string()),
        ..Album::default()
    };

    let json = serde_json::to_value(&album).unwrap();

    assert_eq!(json["imageURL"], "https://example.com/a.jpg");
    // The legacy column never reaches the wire.
    assert!(json.get("reference").is_none());
    assert!(json.get("image_url").is_none());
}

#[test]
fn test_post_view_resolves_weak_references() {
    let owned = Post {
        id: "p1".to_string(),
        username: Some("writer".to_string()),
        album_id: Some("a1".to_string()),
        ..Post::default()
    };
    let view = PostView::from(owned);
    assert_eq!(view.user, "writer");
    assert_eq!(view.album.as_deref(), Some("a1"));

    // A cleared owner renders as the placeholder; a cleared album as null.
    let orphaned = Post {
        id: "p2".to_string(),
        username: None,
        album_id: None,
        ..Post::default()
    };
    let view = PostView::from(orphaned);
    assert_eq!(view.user, "anonymous");
    assert_eq!(view.album, None);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["user"], "anonymous");
    assert_eq!(json["album"], serde_json::Value::Null);
    assert!(json.get("imageURLs").is_some());
    assert!(json.get("videoURLs").is_some());
}

#[test]
fn test_update_payloads_reject_unknown_keys() {
    // Any unrecognized key fails the whole payload before a field applies.
    let result = serde_json::from_value::<UpdateAlbumRequest>(json!({
        "title": "valid",
        "bogus": "x",
    }));
    assert!(result.is_err());

    let result = serde_json::from_value::<UpdatePostRequest>(json!({ "user": "nope" }));
    assert!(result.is_err());
}

#[test]
fn test_update_payloads_accept_partial_bodies() {
    let update: UpdateAlbumRequest =
        serde_json::from_value(json!({ "imageURL": "https://example.com/x.jpg" })).unwrap();
    assert_eq!(update.image_url.as_deref(), Some("https://example.com/x.jpg"));
    assert!(update.title.is_none());
    assert!(update.description.is_none());

    let update: UpdatePostRequest = serde_json::from_value(json!({})).unwrap();
    assert!(update.title.is_none());
    assert!(update.album.is_none());

    // Omitted None fields stay off the wire when re-serialized.
    let json = serde_json::to_value(&UpdateAlbumRequest {
        title: Some("Only title".to_string()),
        ..UpdateAlbumRequest::default()
    })
    .unwrap();
    assert_eq!(json, json!({ "title": "Only title" }));
}

#[test]
fn test_create_payloads_ignore_unknown_keys() {
    // Creation bodies tolerate extra keys; only updates enforce the
    // allow-list.
    let create: CreateAlbumRequest = serde_json::from_value(json!({
        "title": "T",
        "description": "D",
        "extra": "ignored",
    }))
    .unwrap();
    assert_eq!(create.title, "T");

    let create: CreatePostRequest = serde_json::from_value(json!({
        "title": "T",
        "content": "C",
        "imageURLs": ["https://example.com/a.jpg"],
        "somethingElse": 42,
    }))
    .unwrap();
    assert_eq!(create.image_urls.as_deref(), Some(&["https://example.com/a.jpg".to_string()][..]));
}

#[test]
fn test_create_payloads_require_fields() {
    assert!(serde_json::from_value::<CreateAlbumRequest>(json!({ "title": "T" })).is_err());
    assert!(serde_json::from_value::<CreatePostRequest>(json!({ "content": "C" })).is_err());
    assert!(serde_json::from_value::<LoginRequest>(json!({ "username": "u" })).is_err());
}
