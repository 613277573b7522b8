//! Document helpers over JSON-lines dumps.

use serde_json::json;
use tessera::{
    insert_school, list_all, log_stats, schools_by_topic, top_students, update_topics,
    MemoryCollection,
};

use crate::common::{doc, names, DumpDir};

#[test]
fn schools_survive_save_and_reload() {
    let dumps = DumpDir::new();
    let path = dumps.write(
        "schools.jsonl",
        &[
            json!({"_id": {"$oid": "5a8f60cfd4321e1403ba7ab9"}, "name": "Holberton school", "topics": ["Algo"]}),
            json!({"_id": {"$oid": "5a8f60cfd4321e1403ba7aba"}, "name": "UCSF", "topics": ["MongoDB"]}),
        ],
    );

    let schools = MemoryCollection::load_json_lines(&path).unwrap();
    insert_school(&schools, doc(json!({"name": "UCLA", "topics": ["Python"]}))).unwrap();
    update_topics(&schools, "Holberton school", &["Sys admin", "AI", "Algorithm"]).unwrap();
    schools.save_json_lines(&path).unwrap();

    let reloaded = MemoryCollection::load_json_lines(&path).unwrap();
    assert_eq!(
        names(&list_all(&reloaded).unwrap()),
        vec!["Holberton school", "UCSF", "UCLA"]
    );
    assert_eq!(list_all(&reloaded).unwrap()[0]["_id"], json!("5a8f60cfd4321e1403ba7ab9"));
    assert!(schools_by_topic(&reloaded, "Algo").unwrap().is_empty());
    assert_eq!(
        names(&schools_by_topic(&reloaded, "AI").unwrap()),
        vec!["Holberton school"]
    );
}

#[test]
fn students_ranked_from_dump() {
    let dumps = DumpDir::new();
    let path = dumps.write(
        "students.jsonl",
        &[
            json!({"name": "John", "topics": [{"title": "Algo", "score": 10.3}, {"title": "C", "score": 6.2}]}),
            json!({"name": "Bob", "topics": [{"title": "Algo", "score": 15.1}, {"title": "Python", "score": 12.9}]}),
            json!({"name": "Sonia", "topics": [{"title": "Algo", "score": 5.4}]}),
        ],
    );

    let students = MemoryCollection::load_json_lines(&path).unwrap();
    let ranked = top_students(&students).unwrap();
    assert_eq!(names(&ranked), vec!["Bob", "John", "Sonia"]);

    let bob = ranked[0]["averageScore"].as_f64().unwrap();
    assert!((bob - 14.0).abs() < 1e-9);
}

#[test]
fn log_report_from_dump() {
    let dumps = DumpDir::new();
    let path = dumps.write(
        "nginx.jsonl",
        &[
            json!({"ip": "172.31.63.67", "method": "GET", "path": "/status"}),
            json!({"ip": "172.31.63.67", "method": "GET", "path": "/"}),
            json!({"ip": "172.31.2.14", "method": "POST", "path": "/status"}),
        ],
    );

    let logs = MemoryCollection::load_json_lines(&path).unwrap();
    assert_eq!(
        log_stats(&logs).unwrap(),
        "3 logs\n\
         Methods:\n\
         \tmethod GET: 2\n\
         \tmethod POST: 1\n\
         \tmethod PUT: 0\n\
         \tmethod PATCH: 0\n\
         \tmethod DELETE: 0\n\
         1 status check\n\
         IPs:\n\
         \t172.31.63.67: 2\n\
         \t172.31.2.14: 1\n"
    );
}
