use blog_api::pagination::{DEFAULT_PAGE, DEFAULT_SIZE, ListQuery, PageMeta, paginate};

#[test]
fn test_middle_page_metadata() {
    let items: Vec<u32> = (1..=25).collect();

    let (page, meta) = paginate(items, 2, 10);

    assert_eq!(page, (11..=20).collect::<Vec<u32>>());
    assert_eq!(
        meta,
        PageMeta {
            number: 2,
            has_next: true,
            has_prev: true,
            start_index: 11,
            end_index: 20,
            size: 10,
        }
    );
}

#[test]
fn test_last_partial_page() {
    let items: Vec<u32> = (1..=25).collect();

    let (page, meta) = paginate(items, 3, 10);

    assert_eq!(page, (21..=25).collect::<Vec<u32>>());
    assert_eq!(meta.number, 3);
    assert!(!meta.has_next);
    assert!(meta.has_prev);
    assert_eq!(meta.start_index, 21);
    assert_eq!(meta.end_index, 25);
}

#[test]
fn test_exact_boundary_has_no_phantom_page() {
    let items: Vec<u32> = (1..=20).collect();

    let (page, meta) = paginate(items, 2, 10);

    assert_eq!(page.len(), 10);
    assert!(!meta.has_next);
    assert_eq!(meta.end_index, 20);
}

#[test]
fn test_page_past_the_end_clamps_to_last() {
    let items: Vec<u32> = (1..=5).collect();

    let (page, meta) = paginate(items, 99, 2);

    assert_eq!(page, vec![5]);
    assert_eq!(meta.number, 3);
    assert!(!meta.has_next);
}

#[test]
fn test_empty_collection_metadata() {
    let (page, meta) = paginate(Vec::<u32>::new(), 1, 10);

    assert!(page.is_empty());
    assert_eq!(
        meta,
        PageMeta {
            number: 1,
            has_next: false,
            has_prev: false,
            start_index: 0,
            end_index: 0,
            size: 10,
        }
    );
}

#[test]
fn test_query_defaults_and_junk_values() {
    let query = ListQuery::default();
    assert_eq!(query.page(), DEFAULT_PAGE);
    assert_eq!(query.size(), DEFAULT_SIZE);

    // Non-numeric values are silently ignored.
    let query = ListQuery {
        page: Some("abc".to_string()),
        size: Some("ten".to_string()),
        search: None,
    };
    assert_eq!(query.page(), DEFAULT_PAGE);
    assert_eq!(query.size(), DEFAULT_SIZE);

    // Zero and negative values are treated the same way.
    let query = ListQuery {
        page: Some("0".to_string()),
        size: Some("-3".to_string()),
        search: None,
    };
    assert_eq!(query.page(), DEFAULT_PAGE);
    assert_eq!(query.size(), DEFAULT_SIZE);

    let query = ListQuery {
        page: Some("4".to_string()),
        size: Some("25".to_string()),
        search: None,
    };
    assert_eq!(query.page(), 4);
    assert_eq!(query.size(), 25);
}

#[test]
fn test_serialized_metadata_uses_wire_names() {
    let (_, meta) = paginate(vec![1, 2, 3], 1, 2);
    let json = serde_json::to_value(&meta).unwrap();

    assert_eq!(json["number"], 1);
    assert_eq!(json["hasNext"], true);
    assert_eq!(json["hasPrev"], false);
    assert_eq!(json["startIndex"], 1);
    assert_eq!(json["endIndex"], 2);
    assert_eq!(json["size"], 2);
}
