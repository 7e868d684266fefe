use blog_api::{
    models::{CreateAlbumRequest, CreatePostRequest, UpdatePostRequest, User},
    repository::{MemoryRepository, Repository},
};
use std::time::Duration;
use uuid::Uuid;

// Semantics shared by both repository implementations, exercised on the
// in-memory one: ordering, search, duplicate rejection, and weak-reference
// clearing.

fn album_req(title: &str, description: &str) -> CreateAlbumRequest {
    CreateAlbumRequest {
        title: title.to_string(),
        description: description.to_string(),
        image_url: None,
    }
}

fn post_req(title: &str, content: &str) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        content: content.to_string(),
        image_urls: None,
        video_urls: None,
        album: None,
    }
}

async fn seed_user(repo: &MemoryRepository, username: &str) -> Uuid {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash: "unused".to_string(),
        is_staff: true,
    };
    repo.create_user(user.clone()).await.unwrap();
    user.id
}

#[tokio::test]
async fn test_duplicate_album_id_rejected_without_overwrite() {
    let repo = MemoryRepository::new();

    let first = repo
        .create_album("a1".to_string(), album_req("First", "D"))
        .await;
    assert!(first.is_some());

    let second = repo
        .create_album("a1".to_string(), album_req("Second", "D"))
        .await;
    assert!(second.is_none());

    assert_eq!(repo.get_album("a1").await.unwrap().title, "First");
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let repo = MemoryRepository::new();

    for index in 1..=3 {
        repo.create_album(
            format!("a{}", index),
            album_req(&format!("Album {}", index), "D"),
        )
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(3)).await;
    }

    let ids: Vec<String> = repo
        .list_albums(None)
        .await
        .into_iter()
        .map(|album| album.id)
        .collect();
    assert_eq!(ids, vec!["a3", "a2", "a1"]);
}

#[tokio::test]
async fn test_album_search_fields_and_case() {
    let repo = MemoryRepository::new();

    repo.create_album(
        "summer-2025".to_string(),
        CreateAlbumRequest {
            title: "Beach".to_string(),
            description: "Sunny days".to_string(),
            image_url: Some("https://example.com/Cover.jpg".to_string()),
        },
    )
    .await
    .unwrap();

    // id, description, and imageURL all match, case-insensitively.
    assert_eq!(repo.list_albums(Some("SUMMER".to_string())).await.len(), 1);
    assert_eq!(repo.list_albums(Some("sunny".to_string())).await.len(), 1);
    assert_eq!(repo.list_albums(Some("cover".to_string())).await.len(), 1);
    // An unmatched term yields an empty collection.
    assert!(repo.list_albums(Some("winter".to_string())).await.is_empty());
}

#[tokio::test]
async fn test_post_search_reaches_joined_fields() {
    let repo = MemoryRepository::new();
    let author = seed_user(&repo, "Maria").await;

    repo.create_album("travel".to_string(), album_req("Roadtrip Shots", "D"))
        .await
        .unwrap();

    let mut linked = post_req("On the road", "words");
    linked.album = Some("travel".to_string());
    linked.video_urls = Some(vec!["https://videos.example.com/clip-42".to_string()]);
    repo.create_post("p1".to_string(), linked, author)
        .await
        .unwrap();
    repo.create_post("p2".to_string(), post_req("Other", "words"), author)
        .await
        .unwrap();

    // Through the linked album's title.
    let found = repo.list_posts(Some("roadtrip".to_string())).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "p1");

    // Through the owner's username.
    assert_eq!(repo.list_posts(Some("maria".to_string())).await.len(), 2);

    // Through a URL list element.
    let found = repo.list_posts(Some("clip-42".to_string())).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "p1");
}

#[tokio::test]
async fn test_post_owner_username_is_resolved() {
    let repo = MemoryRepository::new();
    let author = seed_user(&repo, "writer").await;

    let created = repo
        .create_post("p1".to_string(), post_req("T", "C"), author)
        .await
        .unwrap();
    assert_eq!(created.username.as_deref(), Some("writer"));
    assert_eq!(created.user_id, Some(author));
}

#[tokio::test]
async fn test_album_link_resolution_on_create_and_update() {
    let repo = MemoryRepository::new();
    let author = seed_user(&repo, "writer").await;

    repo.create_album("real".to_string(), album_req("Real", "D"))
        .await
        .unwrap();

    // Unresolvable on create: the post lands unlinked.
    let mut unlinked = post_req("T", "C");
    unlinked.album = Some("ghost".to_string());
    let created = repo
        .create_post("p1".to_string(), unlinked, author)
        .await
        .unwrap();
    assert_eq!(created.album_id, None);

    // Resolvable on update: the link is set.
    let updated = repo
        .update_post(
            "p1",
            UpdatePostRequest {
                album: Some("real".to_string()),
                ..UpdatePostRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.album_id.as_deref(), Some("real"));

    // Unresolvable on update: the existing link stays untouched.
    let updated = repo
        .update_post(
            "p1",
            UpdatePostRequest {
                album: Some("ghost".to_string()),
                ..UpdatePostRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.album_id.as_deref(), Some("real"));
}

#[tokio::test]
async fn test_deleting_album_clears_post_links() {
    let repo = MemoryRepository::new();
    let author = seed_user(&repo, "writer").await;

    repo.create_album("doomed".to_string(), album_req("Doomed", "D"))
        .await
        .unwrap();
    let mut linked = post_req("T", "C");
    linked.album = Some("doomed".to_string());
    repo.create_post("p1".to_string(), linked, author)
        .await
        .unwrap();

    assert!(repo.delete_album("doomed").await);

    // No cascading delete: the post persists with its reference cleared.
    let post = repo.get_post("p1").await.unwrap();
    assert_eq!(post.album_id, None);
}

#[tokio::test]
async fn test_update_merges_only_supplied_fields() {
    let repo = MemoryRepository::new();
    let author = seed_user(&repo, "writer").await;

    let mut full = post_req("Original", "Original content");
    full.image_urls = Some(vec!["https://example.com/a.jpg".to_string()]);
    repo.create_post("p1".to_string(), full, author)
        .await
        .unwrap();

    let updated = repo
        .update_post(
            "p1",
            UpdatePostRequest {
                title: Some("Renamed".to_string()),
                ..UpdatePostRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.content, "Original content");
    assert_eq!(updated.image_urls, vec!["https://example.com/a.jpg"]);
}

#[tokio::test]
async fn test_delete_unknown_ids_report_failure() {
    let repo = MemoryRepository::new();
    assert!(!repo.delete_album("missing").await);
    assert!(!repo.delete_post("missing").await);
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let repo = MemoryRepository::new();
    seed_user(&repo, "taken").await;

    let duplicate = User {
        id: Uuid::new_v4(),
        username: "taken".to_string(),
        password_hash: "unused".to_string(),
        is_staff: false,
    };
    assert!(repo.create_user(duplicate).await.is_none());
}
