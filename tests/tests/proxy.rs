use ormlet::{Row, Table, Value};
use pretty_assertions::assert_eq;

ormlet::schema! {
    #[database(naming = lower_snake_case)]
    struct Directory;

    #[entity]
    pub trait Employee: ormlet::Entity {
        #[key]
        #[auto]
        fn id(&self) -> Option<i64>;

        fn name(&self) -> String;

        fn nickname(&self) -> Option<String>;

        // Computed-only: no backing storage, no column.
        fn display_name(&self) -> String {
            match self.nickname() {
                Some(nickname) => nickname,
                None => self.name(),
            }
        }
    }
}

#[test]
fn pseudo_constructor_sets_only_supplied_columns() {
    let ada = employee(None, Some("Ada".to_string()), None).unwrap();

    assert_eq!(ada.id(), None);
    assert_eq!(ada.name(), "Ada");
    assert_eq!(ada.nickname(), None);
    assert_eq!(ada.display_name(), "Ada");
}

#[test]
fn pseudo_constructor_requires_non_nullable_columns() {
    let err = employee(Some(1), None, None).unwrap_err();
    assert!(err.is_required_unset());
    assert!(err.to_string().contains("name"));
}

#[test]
fn copy_overrides_only_supplied_columns() {
    let ada = employee(None, Some("Ada".to_string()), None).unwrap();
    let promoted = ada.copy(Some(7), None, Some("Boss".to_string()));

    assert_eq!(promoted.id(), Some(7));
    assert_eq!(promoted.name(), "Ada");
    assert_eq!(promoted.nickname(), Some("Boss".to_string()));
    assert_eq!(promoted.display_name(), "Boss");

    // The source proxy is untouched.
    assert_eq!(ada.id(), None);
    assert_eq!(ada.nickname(), None);
}

#[test]
fn setters_assign_mutable_columns() {
    let mut ada = employee(None, Some("Ada".to_string()), None).unwrap();

    ada.set_name("Grace".to_string());
    ada.set_nickname(Some("G".to_string()));
    assert_eq!(ada.name(), "Grace");
    assert_eq!(ada.nickname(), Some("G".to_string()));

    ada.set_nickname(None);
    assert_eq!(ada.nickname(), None);
}

#[test]
fn default_row_mapping_fills_the_property_map() {
    let table = EmployeeTable::new();
    let row = Row::new()
        .with("id", Value::I64(3))
        .with("name", Value::String("Lin".to_string()));

    let lin = EmployeeProxy::from_row(&table, &row).unwrap();
    assert_eq!(lin.id(), Some(3));
    assert_eq!(lin.name(), "Lin");
    assert_eq!(lin.nickname(), None);
}

#[test]
fn proxy_table_descriptor_resolves_like_a_record() {
    let table = EmployeeTable::new();

    assert_eq!(table.descriptor().name(), "employee");
    let names: Vec<&str> = table.columns().iter().map(|column| column.name()).collect();
    assert_eq!(names, vec!["id", "name", "nickname"]);
    assert!(table.columns()[0].is_primary_key());
}

#[test]
fn sequence_accessor_is_generated_for_proxies() {
    let db = tests::db();
    let seq = employees(&db);
    assert!(seq.rows().unwrap().is_empty());
}

#[test]
#[should_panic(expected = "property `name` of `Employee`")]
fn reading_an_unset_required_property_panics() {
    let blank = EmployeeProxy::default();
    let _ = blank.name();
}
