use ormlet::{Table, Value};
use pretty_assertions::assert_eq;
use tests::db;

ormlet::schema! {
    #[database(naming = lower_snake_case, insert_helpers)]
    struct Blog;

    #[entity]
    #[derive(Debug, Clone, PartialEq)]
    pub struct Author {
        #[key]
        #[auto]
        id: Option<i64>,
        name: String,
    }

    #[entity]
    #[derive(Debug, Clone, PartialEq)]
    pub struct Post {
        #[key]
        #[auto]
        id: Option<i64>,
        #[references(Author)]
        author_id: Option<i64>,
        title: String,
    }
}

#[test]
fn reference_column_binds_to_the_target_primary_key() {
    let posts = PostTable::new();
    let authors = AuthorTable::new();

    let reference = posts.author_id.reference().unwrap();
    assert_eq!(reference.table, "author");
    assert_eq!(reference.column, "id");

    // The reference column's storage type equals the target key's.
    assert_eq!(posts.author_id.sql_type(), authors.id.sql_type());
    assert!(posts.author_id.is_reference());
    assert!(!posts.title.is_reference());
}

#[test]
fn referenced_rows_join_by_key_value() {
    let db = db();

    let mut author = Author {
        id: None,
        name: "Ursula".to_string(),
    };
    authors(&db).add(&mut author).unwrap();

    let mut post = Post {
        id: None,
        author_id: author.id,
        title: "Dispossessed".to_string(),
    };
    posts(&db).add(&mut post).unwrap();

    let table = PostTable::new();
    let rows = posts(&db)
        .filter(table.author_id.eq(author.id))
        .rows()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].value("title"),
        Some(&Value::String("Dispossessed".to_string()))
    );

    let loaded = table.from_row(&rows[0]).unwrap();
    assert_eq!(loaded.author_id, author.id);
}
