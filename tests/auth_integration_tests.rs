use blog_api::{SessionStore, auth};
use uuid::Uuid;

// --- Session Store ---

#[test]
fn test_session_open_resolve_close() {
    let store = SessionStore::new();
    let user_id = Uuid::new_v4();

    let token = store.open(user_id);
    assert_eq!(store.resolve(token), Some(user_id));

    assert!(store.close(token));
    assert_eq!(store.resolve(token), None);

    // Closing an already-closed session reports failure.
    assert!(!store.close(token));
}

#[test]
fn test_unknown_token_does_not_resolve() {
    let store = SessionStore::new();
    assert_eq!(store.resolve(Uuid::new_v4()), None);
}

#[test]
fn test_sessions_are_independent() {
    let store = SessionStore::new();
    let first_user = Uuid::new_v4();
    let second_user = Uuid::new_v4();

    let first = store.open(first_user);
    let second = store.open(second_user);

    store.close(first);

    // Closing one session leaves the other untouched.
    assert_eq!(store.resolve(first), None);
    assert_eq!(store.resolve(second), Some(second_user));
}

// --- Password Hashing ---

#[test]
fn test_hash_and_verify_roundtrip() {
    let hash = auth::hash_password("correct horse battery staple").unwrap();
    assert!(auth::verify_password("correct horse battery staple", &hash));
    assert!(!auth::verify_password("wrong password", &hash));
}

#[test]
fn test_hashes_are_salted() {
    let first = auth::hash_password("same input").unwrap();
    let second = auth::hash_password("same input").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_garbage_hash_fails_verification() {
    assert!(!auth::verify_password("anything", "not-a-phc-string"));
}
