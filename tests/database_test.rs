use cairndb::query::{matcher, planner, planner::QueryPlan};
use cairndb::{
    from_document, Condition, Database, Document, ErrorKind, FindOptions, Query, TextIndexed,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Address {
    postcode: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Restaurant {
    name: String,
    cuisine: String,
    address: Address,
}

impl TextIndexed for Restaurant {
    fn text_index_fields() -> &'static [&'static str] {
        &["name", "cuisine"]
    }
}

impl Restaurant {
    fn new(name: &str, cuisine: &str, postcode: &str) -> Self {
        Restaurant {
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            address: Address {
                postcode: postcode.to_string(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Employee {
    name: String,
    age: String,
}

impl TextIndexed for Employee {}

impl Employee {
    fn new(name: &str, age: &str) -> Self {
        Employee {
            name: name.to_string(),
            age: age.to_string(),
        }
    }
}

fn open_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("db")).unwrap();
    (dir, db)
}

fn seed_restaurants(db: &Database) -> Vec<String> {
    db.insert_many(
        "restaurants",
        &[
            Restaurant::new("Rule of Thirds", "Japanese", "80000"),
            Restaurant::new("Xi'an Famous Foods", "Chinese", "10000"),
            Restaurant::new("Good Bread", "Chinese", "10000"),
            Restaurant::new("Shanghai Cuisine", "Chinese", "10000"),
        ],
    )
    .unwrap()
}

fn seed_employees(db: &Database) -> Vec<String> {
    db.insert_many(
        "employees",
        &[
            Employee::new("John", "25"),
            Employee::new("John", "20"),
            Employee::new("Jane", "30"),
            Employee::new("Doe", "35"),
        ],
    )
    .unwrap()
}

fn names(documents: &[Document]) -> Vec<String> {
    let mut names: Vec<String> = documents
        .iter()
        .map(|d| d.get("name").unwrap().as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

fn sorted_ids(documents: &[Document]) -> Vec<String> {
    let mut ids: Vec<String> = documents
        .iter()
        .map(|d| d.get("_id").unwrap().as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

#[test]
fn inserted_records_round_trip_by_id() {
    let (_dir, db) = open_db();
    let record = Restaurant::new("Rule of Thirds", "Japanese", "80000");
    let id = db.insert_one("restaurants", &record).unwrap();
    assert_eq!(id.len(), 36, "hyphenated v4 uuid");

    let document = db.find_one_by_id("restaurants", &id).unwrap();
    assert_eq!(document.get("_id").unwrap().as_str().unwrap(), id);

    let back: Restaurant = from_document(&document).unwrap();
    assert_eq!(back, record);
}

#[test]
fn insert_many_returns_one_id_per_record() {
    let (_dir, db) = open_db();
    let ids = seed_employees(&db);
    assert_eq!(ids.len(), 4);
    for id in &ids {
        db.find_one_by_id("employees", id).unwrap();
    }
}

#[test]
fn eq_on_nested_path_via_index() {
    let (_dir, db) = open_db();
    seed_restaurants(&db);

    let query = Query::new().and(vec![
        Condition::eq("cuisine", "Chinese"),
        Condition::eq("address.postcode", "10000"),
    ]);
    assert_eq!(planner::plan(&query), QueryPlan::IndexAssisted);

    let found = db
        .find_many("restaurants", &query, FindOptions { limit: 2 })
        .unwrap();
    assert_eq!(found.len(), 2);
    for document in &found {
        assert_eq!(document.get("cuisine").unwrap().as_str(), Some("Chinese"));
        assert_eq!(
            document
                .get("address")
                .and_then(|address| address.get("postcode"))
                .and_then(|postcode| postcode.as_str()),
            Some("10000")
        );
    }

    let unbounded = db
        .find_many("restaurants", &query, FindOptions::default())
        .unwrap();
    assert_eq!(unbounded.len(), 3);
}

#[test]
fn equality_compares_string_renderings() {
    let (_dir, db) = open_db();
    seed_employees(&db);

    // The stored age is the string "30"; the condition value is numeric.
    let query = Query::new().and(vec![Condition::eq("age", 30)]);
    let found = db
        .find_many("employees", &query, FindOptions::default())
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("name").unwrap().as_str(), Some("Jane"));
    assert_eq!(found[0].get("age").unwrap().as_str(), Some("30"));
}

#[test]
fn or_with_range_group_falls_back_to_scan() {
    let (_dir, db) = open_db();
    seed_employees(&db);

    let query = Query::new()
        .or(vec![
            Condition::eq("name", "John"),
            Condition::eq("name", "Jane"),
        ])
        .and(vec![Condition::gt("age", 20), Condition::lt("age", 40)]);
    assert_eq!(planner::plan(&query), QueryPlan::FullScan);

    let found = db
        .find_many("employees", &query, FindOptions::default())
        .unwrap();
    // John aged 20 fails the range; Doe fails the OR group.
    let mut matched: Vec<(String, String)> = found
        .iter()
        .map(|d| {
            (
                d.get("name").unwrap().as_str().unwrap().to_string(),
                d.get("age").unwrap().as_str().unwrap().to_string(),
            )
        })
        .collect();
    matched.sort();
    assert_eq!(
        matched,
        vec![
            ("Jane".to_string(), "30".to_string()),
            ("John".to_string(), "25".to_string()),
        ]
    );
}

#[test]
fn full_text_search_intersects_tokens() {
    let (_dir, db) = open_db();
    db.insert_many(
        "restaurants",
        &[
            Restaurant::new("Rebel's Pizza", "Italian", "11111"),
            Restaurant::new("Shanghai Baozi", "Chinese", "22222"),
            Restaurant::new("Mama's Pasta", "Italian", "33333"),
            Restaurant::new("Pizza Palace", "Italian", "44444"),
        ],
    )
    .unwrap();

    // "and" is a stop word; unknown tokens are skipped rather than
    // intersected as the empty set.
    let found = db.search("restaurants", "italy and Pizza").unwrap();
    assert_eq!(names(&found), vec!["Pizza Palace", "Rebel's Pizza"]);

    let found = db.search("restaurants", "shanghai").unwrap();
    assert_eq!(names(&found), vec!["Shanghai Baozi"]);

    // Cuisine is text-indexed too; "italian" narrows to pizza places.
    let found = db.search("restaurants", "Italian pizza").unwrap();
    assert_eq!(names(&found), vec!["Pizza Palace", "Rebel's Pizza"]);

    // All stop words: nothing to intersect.
    let found = db.search("restaurants", "the and to").unwrap();
    assert!(found.is_empty());

    // Postcodes are not text-indexed.
    let found = db.search("restaurants", "11111").unwrap();
    assert!(found.is_empty());
}

#[test]
fn delete_restores_index_invariants() {
    let (_dir, db) = open_db();
    seed_employees(&db);

    let query = Query::new().and(vec![Condition::eq("age", 30)]);
    let document = db.find_one("employees", &query).unwrap();
    let id = document.get("_id").unwrap().as_str().unwrap().to_string();

    db.delete_one_by_id("employees", &id).unwrap();

    let err = db.find_one("employees", &query).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoDocuments);

    let err = db.find_one_by_id("employees", &id).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DocumentNotExists);

    let remaining = db
        .find_many("employees", &Query::new(), FindOptions::default())
        .unwrap();
    assert_eq!(remaining.len(), 3);

    // No posting list anywhere still carries the deleted id.
    for (key, posting) in db.index_entries().unwrap() {
        assert!(!posting.contains(&id), "{key} still lists {id}");
    }
    for (key, posting) in db.text_index_entries().unwrap() {
        assert!(!posting.contains(&id), "{key} still lists {id}");
    }
}

#[test]
fn deleting_a_text_indexed_document_removes_its_tokens() {
    let (_dir, db) = open_db();
    let ids = db
        .insert_many(
            "restaurants",
            &[
                Restaurant::new("Rebel's Pizza", "Italian", "11111"),
                Restaurant::new("Pizza Palace", "Italian", "44444"),
            ],
        )
        .unwrap();

    db.delete_one_by_id("restaurants", &ids[0]).unwrap();

    let found = db.search("restaurants", "pizza").unwrap();
    assert_eq!(names(&found), vec!["Pizza Palace"]);
}

#[test]
fn find_one_by_id_rejects_unknown_ids() {
    let (_dir, db) = open_db();
    seed_restaurants(&db);

    let err = db.find_one_by_id("restaurants", "nonexistent").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DocumentNotExists);

    let err = db.delete_one_by_id("restaurants", "nonexistent").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DocumentNotExists);
}

#[test]
fn limit_bounds_result_sizes() {
    let (_dir, db) = open_db();
    seed_employees(&db);

    let query = Query::new().or(vec![
        Condition::eq("name", "John"),
        Condition::eq("name", "Jane"),
        Condition::eq("name", "Doe"),
    ]);
    let total = db
        .find_many("employees", &query, FindOptions::default())
        .unwrap()
        .len();
    assert_eq!(total, 4);

    for limit in 1..=6 {
        let found = db
            .find_many("employees", &query, FindOptions { limit })
            .unwrap();
        assert_eq!(found.len(), limit.min(total));
    }
}

#[test]
fn planner_paths_agree_with_a_scan_reference() {
    let (_dir, db) = open_db();
    seed_employees(&db);
    seed_restaurants(&db);

    let queries = vec![
        Query::new().and(vec![Condition::eq("name", "John")]),
        Query::new().and(vec![
            Condition::eq("name", "John"),
            Condition::gte("age", 25),
        ]),
        Query::new().or(vec![
            Condition::eq("name", "Jane"),
            Condition::eq("age", "20"),
        ]),
        Query::new()
            .or(vec![
                Condition::eq("name", "John"),
                Condition::eq("name", "Doe"),
            ])
            .and(vec![Condition::eq("age", "35")]),
        Query::new().and(vec![Condition::ne("name", "John")]),
        Query::new().or(vec![
            Condition::eq("name", "Jane"),
            Condition::lt("age", 26),
        ]),
        Query::new().and(vec![Condition::eq("salary", 1)]),
    ];

    let everything = db
        .find_many("employees", &Query::new(), FindOptions::default())
        .unwrap();

    for query in queries {
        let found = db
            .find_many("employees", &query, FindOptions::default())
            .unwrap();
        let reference: Vec<Document> = everything
            .iter()
            .filter(|document| matcher::matches(document, &query))
            .cloned()
            .collect();
        assert_eq!(
            sorted_ids(&found),
            sorted_ids(&reference),
            "divergence on {query:?}"
        );
    }
}

#[test]
fn collections_are_isolated() {
    let (_dir, db) = open_db();
    seed_employees(&db);
    seed_restaurants(&db);

    let employees = db
        .find_many("employees", &Query::new(), FindOptions::default())
        .unwrap();
    assert_eq!(employees.len(), 4);

    let query = Query::new().and(vec![Condition::eq("name", "John")]);
    let in_restaurants = db
        .find_many("restaurants", &query, FindOptions::default())
        .unwrap();
    assert!(in_restaurants.is_empty());
}

#[test]
fn clear_empties_every_keyspace() {
    let (_dir, db) = open_db();
    seed_employees(&db);
    seed_restaurants(&db);

    db.clear().unwrap();

    let found = db
        .find_many("restaurants", &Query::new(), FindOptions::default())
        .unwrap();
    assert!(found.is_empty());
    assert!(db.index_entries().unwrap().is_empty());
    assert!(db.text_index_entries().unwrap().is_empty());
    assert!(db.search("restaurants", "pizza").unwrap().is_empty());
}

#[test]
fn invalid_collection_names_are_rejected() {
    let (_dir, db) = open_db();

    let err = db
        .insert_one("bad:name", &Employee::new("x", "1"))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let err = db.insert_one("", &Employee::new("x", "1")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[test]
fn close_flushes_all_keyspaces() {
    let (_dir, db) = open_db();
    seed_employees(&db);
    db.close().unwrap();
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("db");

    let db = Database::open(&path).unwrap();
    let ids = seed_employees(&db);
    db.close().unwrap();

    let db = Database::open(&path).unwrap();
    let document = db.find_one_by_id("employees", &ids[2]).unwrap();
    assert_eq!(document.get("name").unwrap().as_str(), Some("Jane"));

    // The secondary index survives too.
    let query = Query::new().and(vec![Condition::eq("name", "Jane")]);
    assert_eq!(planner::plan(&query), QueryPlan::IndexAssisted);
    let found = db
        .find_many("employees", &query, FindOptions::default())
        .unwrap();
    assert_eq!(found.len(), 1);
}
