//! Behavioral tests for tessera-docstore
//!
//! Exercise the query helpers over `MemoryCollection`:
//!
//! 1. Schools: insert, topic replacement, listing, topic lookup
//! 2. Students: average-score ranking, empty topic lists
//! 3. Log statistics: exact report text for a seeded log collection

use serde_json::{json, Value as JsonValue};
use tessera_core::{Document, Error, ID_FIELD};
use tessera_docstore::{
    insert_school, list_all, log_stats, schools_by_topic, top_students, update_topics,
    DocumentCollection, Filter, LogStats, MemoryCollection, AVERAGE_FIELD,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn doc(value: JsonValue) -> Document {
    value.as_object().cloned().unwrap()
}

fn names(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .map(|d| d["name"].as_str().unwrap().to_string())
        .collect()
}

fn schools() -> MemoryCollection {
    MemoryCollection::from_documents(vec![
        doc(json!({"name": "Holberton school", "topics": ["Algo", "C"]})),
        doc(json!({"name": "UCSF", "topics": ["Algo", "MongoDB"]})),
        doc(json!({"name": "UCLA", "topics": ["C", "Python"]})),
        doc(json!({"name": "UCSF", "topics": []})),
    ])
    .unwrap()
}

// ============================================================================
// Schools
// ============================================================================

#[test]
fn test_list_all_empty_collection() {
    let c = MemoryCollection::new();
    assert!(list_all(&c).unwrap().is_empty());
}

#[test]
fn test_insert_school_returns_id_of_new_document() {
    let c = MemoryCollection::new();
    let id = insert_school(&c, doc(json!({"name": "UCSF", "address": "505 Parnassus Ave"}))).unwrap();

    let all = list_all(&c).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0][ID_FIELD], json!(id));
    assert_eq!(all[0]["address"], json!("505 Parnassus Ave"));
}

#[test]
fn test_update_topics_updates_every_match() {
    let c = schools();
    let result = update_topics(&c, "UCSF", &["Sys admin", "Docker"]).unwrap();
    assert_eq!(result.matched, 2);
    assert_eq!(result.modified, 2);

    let ucsf = c.find(&Filter::new().eq("name", "UCSF")).unwrap();
    for school in ucsf {
        assert_eq!(school["topics"], json!(["Sys admin", "Docker"]));
    }
    let ucla = &c.find(&Filter::new().eq("name", "UCLA")).unwrap()[0];
    assert_eq!(ucla["topics"], json!(["C", "Python"]));
}

#[test]
fn test_update_topics_without_match_changes_nothing() {
    let c = schools();
    let before = list_all(&c).unwrap();

    let result = update_topics(&c, "MIT", &["Physics"]).unwrap();
    assert_eq!(result.matched, 0);
    assert_eq!(list_all(&c).unwrap(), before);
}

#[test]
fn test_update_topics_with_empty_list() {
    let c = schools();
    update_topics::<&str>(&c, "UCLA", &[]).unwrap();
    let ucla = &c.find(&Filter::new().eq("name", "UCLA")).unwrap()[0];
    assert_eq!(ucla["topics"], json!([]));
}

#[test]
fn test_schools_by_topic() {
    let c = schools();
    assert_eq!(
        names(&schools_by_topic(&c, "Algo").unwrap()),
        vec!["Holberton school", "UCSF"]
    );
    assert_eq!(names(&schools_by_topic(&c, "Python").unwrap()), vec!["UCLA"]);
    assert!(schools_by_topic(&c, "Rust").unwrap().is_empty());
}

// ============================================================================
// Students
// ============================================================================

#[test]
fn test_top_students_orders_by_average() {
    let c = MemoryCollection::from_documents(vec![
        doc(json!({"name": "Low", "topics": [{"title": "a", "score": 5}]})),
        doc(json!({"name": "High", "topics": [
            {"title": "a", "score": 10},
            {"title": "b", "score": 20}
        ]})),
    ])
    .unwrap();

    let ranked = top_students(&c).unwrap();
    assert_eq!(names(&ranked), vec!["High", "Low"]);
    assert_eq!(ranked[0][AVERAGE_FIELD].as_f64(), Some(15.0));
    assert_eq!(ranked[1][AVERAGE_FIELD].as_f64(), Some(5.0));
}

#[test]
fn test_top_students_fractional_average() {
    let c = MemoryCollection::from_documents(vec![doc(json!({"name": "A", "topics": [
        {"title": "x", "score": 4.5},
        {"title": "y", "score": 3}
    ]}))])
    .unwrap();
    let ranked = top_students(&c).unwrap();
    assert_eq!(ranked[0][AVERAGE_FIELD].as_f64(), Some(3.75));
}

#[test]
fn test_top_students_empty_topics_sort_last_with_null_average() {
    let c = MemoryCollection::from_documents(vec![
        doc(json!({"name": "Nobody", "topics": []})),
        doc(json!({"name": "Some", "topics": [{"title": "a", "score": 1}]})),
    ])
    .unwrap();

    let ranked = top_students(&c).unwrap();
    assert_eq!(names(&ranked), vec!["Some", "Nobody"]);
    assert_eq!(ranked[1][AVERAGE_FIELD], JsonValue::Null);
}

#[test]
fn test_top_students_missing_topics_is_an_error() {
    let c = MemoryCollection::from_documents(vec![doc(json!({"name": "Ghost"}))]).unwrap();
    assert!(matches!(top_students(&c), Err(Error::InvalidOperation(_))));
}

#[test]
fn test_top_students_does_not_modify_collection() {
    let c = MemoryCollection::from_documents(vec![doc(
        json!({"name": "A", "topics": [{"title": "a", "score": 1}]}),
    )])
    .unwrap();
    top_students(&c).unwrap();
    assert!(list_all(&c).unwrap()[0].get(AVERAGE_FIELD).is_none());
}

// ============================================================================
// Log statistics
// ============================================================================

fn log(method: &str, path: &str, ip: &str) -> Document {
    doc(json!({"method": method, "path": path, "ip": ip}))
}

fn seeded_logs() -> MemoryCollection {
    let mut docs = Vec::new();
    // 12 addresses with distinct frequencies so the top 10 are unambiguous
    for i in 0..12u32 {
        let ip = format!("10.0.0.{}", i);
        for _ in 0..(12 - i) {
            docs.push(log("GET", "/", &ip));
        }
    }
    docs.push(log("GET", "/status", "10.0.0.0"));
    docs.push(log("GET", "/status", "10.0.0.1"));
    docs.push(log("POST", "/status", "10.0.0.2"));
    docs.push(log("DELETE", "/item", "10.0.0.3"));
    docs.push(log("HEAD", "/", "10.0.0.4"));
    MemoryCollection::from_documents(docs).unwrap()
}

#[test]
fn test_log_stats_exact_report() {
    let c = seeded_logs();
    // 78 GET / + 2 GET /status + POST + DELETE + HEAD
    let expected = "83 logs\n\
                    Methods:\n\
                    \tmethod GET: 80\n\
                    \tmethod POST: 1\n\
                    \tmethod PUT: 0\n\
                    \tmethod PATCH: 0\n\
                    \tmethod DELETE: 1\n\
                    2 status check\n\
                    IPs:\n\
                    \t10.0.0.0: 13\n\
                    \t10.0.0.1: 12\n\
                    \t10.0.0.2: 11\n\
                    \t10.0.0.3: 10\n\
                    \t10.0.0.4: 9\n\
                    \t10.0.0.5: 7\n\
                    \t10.0.0.6: 6\n\
                    \t10.0.0.7: 5\n\
                    \t10.0.0.8: 4\n\
                    \t10.0.0.9: 3\n";
    assert_eq!(log_stats(&c).unwrap(), expected);
}

#[test]
fn test_log_stats_without_ips() {
    let c = seeded_logs();
    let stats = LogStats::collect_with(&c, None).unwrap();
    let report = stats.to_string();
    assert!(report.ends_with("2 status check\n"));
    assert!(!report.contains("IPs:"));
}

#[test]
fn test_log_stats_empty_collection() {
    let c = MemoryCollection::new();
    assert_eq!(
        log_stats(&c).unwrap(),
        "0 logs\nMethods:\n\tmethod GET: 0\n\tmethod POST: 0\n\tmethod PUT: 0\n\
         \tmethod PATCH: 0\n\tmethod DELETE: 0\n0 status check\nIPs:\n"
    );
}

#[test]
fn test_log_stats_ties_keep_first_seen_order() {
    let c = MemoryCollection::from_documents(vec![
        log("GET", "/", "b"),
        log("GET", "/", "a"),
        log("GET", "/", "c"),
        log("GET", "/", "a"),
    ])
    .unwrap();
    let stats = LogStats::collect(&c).unwrap();
    assert_eq!(
        stats.top_ips.unwrap(),
        vec![
            ("a".to_string(), 2),
            ("b".to_string(), 1),
            ("c".to_string(), 1)
        ]
    );
}
