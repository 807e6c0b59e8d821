//! Walkthrough of the public API: open, insert, query, search, delete.

use cairndb::{from_document, Condition, Database, FindOptions, Query, TextIndexed};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
struct Address {
    postcode: String,
}

#[derive(Serialize, Deserialize, Debug)]
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

#[derive(Serialize, Deserialize, Debug)]
struct Employee {
    name: String,
    age: String,
}

impl TextIndexed for Employee {}

fn restaurant(name: &str, cuisine: &str, postcode: &str) -> Restaurant {
    Restaurant {
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        address: Address {
            postcode: postcode.to_string(),
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open("demo-db")?;
    db.clear()?;

    // Step 1: insert restaurants one by one and read them back by id.
    println!("Step 1: INSERT restaurants");
    let restaurants = [
        restaurant("Rule of Thirds", "Japanese", "80000"),
        restaurant("Xi'an Famous Foods", "Chinese", "10000"),
        restaurant("Joe's Shanghai", "Chinese", "20000"),
        restaurant("Shanghai Asian Manor", "Chinese", "80000"),
        restaurant("Good Bread", "Chinese", "10000"),
        restaurant("Shanghai Cuisine", "Chinese", "10000"),
    ];
    for record in &restaurants {
        let id = db.insert_one("restaurants", record)?;
        let doc = db.find_one_by_id("restaurants", &id)?;
        let found: Restaurant = from_document(&doc)?;
        println!("  {id}: {found:?}");
    }

    // Step 2: batch-insert employees.
    println!("\nStep 2: INSERT employees");
    let ids = db.insert_many(
        "employees",
        &[
            Employee { name: "John".into(), age: "25".into() },
            Employee { name: "John".into(), age: "20".into() },
            Employee { name: "Jane".into(), age: "30".into() },
            Employee { name: "Doe".into(), age: "35".into() },
        ],
    )?;
    println!("  inserted {} employees", ids.len());

    // Step 3: filter queries.
    println!("\nStep 3: QUERY");
    let chinese_in_10000 = Query::new().and(vec![
        Condition::eq("cuisine", "Chinese"),
        Condition::eq("address.postcode", "10000"),
    ]);
    let found = db.find_many("restaurants", &chinese_in_10000, FindOptions { limit: 2 })?;
    println!("  2 Chinese restaurants in 10000:");
    for doc in &found {
        let r: Restaurant = from_document(doc)?;
        println!("    {} ({})", r.name, r.address.postcode);
    }

    // Equality is stringly typed: the stored age "30" matches the number 30.
    let thirty = db.find_one("employees", &Query::new().and(vec![Condition::eq("age", 30)]))?;
    println!("  30-year-old employee: {}", thirty["name"]);

    // A range group forces a collection scan.
    let john_or_jane_between = Query::new()
        .or(vec![Condition::eq("name", "John"), Condition::eq("name", "Jane")])
        .and(vec![Condition::gt("age", 20), Condition::lt("age", 40)]);
    let found = db.find_many("employees", &john_or_jane_between, FindOptions::default())?;
    println!("  John or Jane aged 20..40: {} matches", found.len());

    // Step 4: full-text search over the text-indexed fields.
    println!("\nStep 4: SEARCH");
    for text in ["shanghai", "chinese food", "the and to"] {
        let found = db.search("restaurants", text)?;
        println!("  {text:?}: {} results", found.len());
    }

    // Step 5: delete and confirm the indexes followed.
    println!("\nStep 5: DELETE");
    let id = thirty["_id"].as_str().unwrap();
    db.delete_one_by_id("employees", id)?;
    println!("  deleted employee {id}");
    let remaining = db.find_many("employees", &Query::new(), FindOptions::default())?;
    println!("  {} employees remain", remaining.len());

    db.close()?;
    Ok(())
}
