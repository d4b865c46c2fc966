#![allow(clippy::unwrap_used)]

use super::*;

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_has_current_version() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_keeps_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackui.db");
    {
        let _db = Database::open(&path).unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
}

// ── Key/value ─────────────────────────────────────────────────

#[test]
fn test_get_missing_key() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get("tracker_data").unwrap(), None);
}

#[test]
fn test_put_then_get() {
    let mut db = Database::open_in_memory().unwrap();
    db.put("tracker_categories", "[]").unwrap();
    assert_eq!(db.get("tracker_categories").unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_put_overwrites() {
    let mut db = Database::open_in_memory().unwrap();
    db.put("k", "first").unwrap();
    db.put("k", "second").unwrap();
    assert_eq!(db.get("k").unwrap().as_deref(), Some("second"));
    assert_eq!(db.keys().unwrap(), vec!["k".to_string()]);
}

#[test]
fn test_put_all_writes_every_pair() {
    let mut db = Database::open_in_memory().unwrap();
    db.put_all(&[("a", "1"), ("b", "2")]).unwrap();
    assert_eq!(db.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(db.get("b").unwrap().as_deref(), Some("2"));
    assert_eq!(db.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_put_all_empty_is_noop() {
    let mut db = Database::open_in_memory().unwrap();
    db.put_all(&[]).unwrap();
    assert!(db.keys().unwrap().is_empty());
}

#[test]
fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackui.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.put("tracker_data", r#"[{"month":0,"year":2024,"entries":[]}]"#)
            .unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(
        db.get("tracker_data").unwrap().as_deref(),
        Some(r#"[{"month":0,"year":2024,"entries":[]}]"#)
    );
}

#[test]
fn test_unicode_values() {
    let mut db = Database::open_in_memory().unwrap();
    db.put("note", "café 日本語 🎉").unwrap();
    assert_eq!(db.get("note").unwrap().as_deref(), Some("café 日本語 🎉"));
}
