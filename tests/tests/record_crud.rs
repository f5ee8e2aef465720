use ormlet::{Table, Value};
use pretty_assertions::assert_eq;
use tests::db;

ormlet::schema! {
    #[database(naming = lower_snake_case, insert_helpers, update_helpers)]
    struct Blog;

    #[entity]
    #[derive(Debug, Clone, PartialEq)]
    pub struct User {
        #[key]
        #[auto]
        id: Option<i64>,
        name: String,
        visits: i32,
    }
}

#[test]
fn resolved_names_follow_the_global_strategy() {
    let table = UserTable::new();

    assert_eq!(table.descriptor().name(), "user");
    let names: Vec<&str> = table.columns().iter().map(|column| column.name()).collect();
    assert_eq!(names, vec!["id", "name", "visits"]);
}

#[test]
fn insert_assigns_distinct_generated_keys() {
    let db = db();
    let seq = users(&db);

    let mut alice = User {
        id: None,
        name: "Alice".to_string(),
        visits: 1,
    };
    let mut bob = User {
        id: None,
        name: "Bob".to_string(),
        visits: 2,
    };

    assert_eq!(seq.add(&mut alice).unwrap(), 1);
    assert_eq!(seq.add(&mut bob).unwrap(), 1);

    // The unset keys were omitted from the assignment lists and the two
    // generated values were assigned back, distinct and non-null.
    assert!(alice.id.is_some());
    assert!(bob.id.is_some());
    assert_ne!(alice.id, bob.id);
}

#[test]
fn insert_keeps_an_explicit_key() {
    let db = db();
    let seq = users(&db);

    let mut carol = User {
        id: Some(40),
        name: "Carol".to_string(),
        visits: 0,
    };
    seq.add(&mut carol).unwrap();

    assert_eq!(carol.id, Some(40));
    let rows = seq.rows().unwrap();
    assert_eq!(rows[0].value("id"), Some(&Value::I64(40)));
}

#[test]
fn materialization_round_trips_every_column() {
    let db = db();
    let seq = users(&db);

    let mut alice = User {
        id: None,
        name: "Alice".to_string(),
        visits: 7,
    };
    seq.add(&mut alice).unwrap();

    let rows = seq.rows().unwrap();
    assert_eq!(rows.len(), 1);

    let loaded = seq.table().from_row(&rows[0]).unwrap();
    assert_eq!(loaded, alice);

    // Reading the accessors back reproduces the row's values.
    let table = seq.table();
    assert_eq!(table.id.read(&loaded), Value::I64(alice.id.unwrap()));
    assert_eq!(table.name.read(&loaded), Value::String("Alice".to_string()));
    assert_eq!(table.visits.read(&loaded), Value::I32(7));
}

#[test]
fn update_touches_only_the_matching_row() {
    let db = db();
    let seq = users(&db);

    let mut alice = User {
        id: None,
        name: "Alice".to_string(),
        visits: 1,
    };
    let mut bob = User {
        id: None,
        name: "Bob".to_string(),
        visits: 1,
    };
    seq.add(&mut alice).unwrap();
    seq.add(&mut bob).unwrap();

    alice.name = "Alicia".to_string();
    assert_eq!(seq.update(&alice).unwrap(), 1);

    let table = UserTable::new();
    let rows = users(&db)
        .filter(table.id.eq(alice.id))
        .rows()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("name"), Some(&Value::String("Alicia".to_string())));

    // The other row is untouched.
    let rows = users(&db).filter(table.id.eq(bob.id)).rows().unwrap();
    assert_eq!(rows[0].value("name"), Some(&Value::String("Bob".to_string())));
}

#[test]
fn mutation_helpers_refuse_derived_views() {
    let db = db();
    let table = UserTable::new();

    let mut user = User {
        id: None,
        name: "Dave".to_string(),
        visits: 0,
    };

    let err = users(&db)
        .filter(table.name.eq("Dave"))
        .update(&user)
        .unwrap_err();
    assert!(err.is_derived_view());

    let err = users(&db).take(10).add(&mut user).unwrap_err();
    assert!(err.is_derived_view());

    let err = users(&db).skip(2).update(&user).unwrap_err();
    assert!(err.is_derived_view());

    let err = users(&db).group_by(&table.name).add(&mut user).unwrap_err();
    assert!(err.is_derived_view());

    let err = users(&db)
        .sort_by(&table.name, ormlet::SortOrder::Ascending)
        .update(&user)
        .unwrap_err();
    assert!(err.is_derived_view());

    // The unmodified default collection accepts the same operations.
    users(&db).add(&mut user).unwrap();
    users(&db).update(&user).unwrap();
}

#[test]
fn sequences_filter_sort_and_page() {
    let db = db();
    let seq = users(&db);
    let table = UserTable::new();

    for (name, visits) in [("a", 3), ("b", 1), ("c", 2)] {
        let mut user = User {
            id: None,
            name: name.to_string(),
            visits,
        };
        seq.add(&mut user).unwrap();
    }

    let rows = users(&db)
        .sort_by(&table.visits, ormlet::SortOrder::Descending)
        .rows()
        .unwrap();
    let visits: Vec<&Value> = rows.iter().filter_map(|row| row.value("visits")).collect();
    assert_eq!(visits, vec![&Value::I32(3), &Value::I32(2), &Value::I32(1)]);

    let rows = users(&db)
        .sort_by(&table.visits, ormlet::SortOrder::Ascending)
        .skip(1)
        .take(1)
        .rows()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value("visits"), Some(&Value::I32(2)));
}
