use super::test_db;

const PARAMS: &str = r##"{"color":"#000000","size":256,"logo":null,"format":"png"}"##;

#[test]
fn test_record_and_list_newest_first() {
    let db = test_db();
    let first = db
        .record_history("owner-a", "one", "2025-01-01T00:00:00.000Z", PARAMS)
        .unwrap();
    let second = db
        .record_history("owner-a", "two", "2025-01-01T00:00:01.000Z", PARAMS)
        .unwrap();
    assert!(second > first);

    let entries = db.list_active_history("owner-a", 50).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "two");
    assert_eq!(entries[1].text, "one");
    assert!(entries.iter().all(|e| e.active));
    assert_eq!(entries[0].params, PARAMS);
}

#[test]
fn test_list_respects_limit() {
    let db = test_db();
    for i in 0..60 {
        db.record_history("owner-a", &format!("t{i}"), "2025-01-01T00:00:00.000Z", PARAMS)
            .unwrap();
    }

    let entries = db.list_active_history("owner-a", 50).unwrap();
    assert_eq!(entries.len(), 50);
    assert_eq!(entries[0].text, "t59");
    assert!(entries.windows(2).all(|w| w[0].id > w[1].id));
}

#[test]
fn test_owners_are_isolated() {
    let db = test_db();
    db.record_history("owner-a", "mine", "2025-01-01T00:00:00.000Z", PARAMS)
        .unwrap();
    db.record_history("owner-b", "theirs", "2025-01-01T00:00:00.000Z", PARAMS)
        .unwrap();

    let a = db.list_active_history("owner-a", 50).unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].owner_id, "owner-a");

    let b = db.list_active_history("owner-b", 50).unwrap();
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].text, "theirs");
}

#[test]
fn test_deactivate_keeps_rows() {
    let db = test_db();
    for _ in 0..3 {
        db.record_history("owner-a", "x", "2025-01-01T00:00:00.000Z", PARAMS)
            .unwrap();
    }
    db.record_history("owner-b", "y", "2025-01-01T00:00:00.000Z", PARAMS)
        .unwrap();

    assert_eq!(db.deactivate_history("owner-a").unwrap(), 3);
    assert!(db.list_active_history("owner-a", 50).unwrap().is_empty());
    assert_eq!(db.count_history("owner-a").unwrap(), 3);

    // Already inactive rows are not counted again.
    assert_eq!(db.deactivate_history("owner-a").unwrap(), 0);
    assert_eq!(db.list_active_history("owner-b", 50).unwrap().len(), 1);
}

#[test]
fn test_record_rejects_empty_owner() {
    let db = test_db();
    assert!(db.record_history("", "x", "2025-01-01T00:00:00.000Z", PARAMS).is_err());
}

#[test]
fn test_entry_serializes_with_wire_names() {
    let db = test_db();
    db.record_history("owner-a", "hello", "2025-01-01T00:00:00.000Z", PARAMS)
        .unwrap();
    let entry = db.list_active_history("owner-a", 1).unwrap().remove(0);

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["ownerId"], "owner-a");
    assert_eq!(json["date"], "2025-01-01T00:00:00.000Z");
    assert_eq!(json["active"], true);
    assert!(json["params"].is_string());
}
