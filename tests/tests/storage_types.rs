use ormlet::{Row, SqlType, Table, Value};
use pretty_assertions::assert_eq;

ormlet::schema! {
    #[database]
    struct Clock;

    #[entity]
    #[derive(Debug, Clone, PartialEq)]
    pub struct Event {
        #[key]
        id: uuid::Uuid,
        at: jiff::Timestamp,
        level: i16,
        payload: Vec<u8>,
        note: Option<String>,
        #[column(sql = varchar(8))]
        code: String,
    }
}

#[test]
fn builtin_types_map_to_their_storage_types() {
    let table = EventTable::new();

    assert_eq!(table.id.sql_type(), &SqlType::Uuid);
    assert_eq!(table.at.sql_type(), &SqlType::Timestamp);
    assert_eq!(table.level.sql_type(), &SqlType::SmallInt);
    assert_eq!(table.payload.sql_type(), &SqlType::Blob);
    assert_eq!(table.note.sql_type(), &SqlType::Text);
    // An explicit storage type overrides the builtin mapping.
    assert_eq!(table.code.sql_type(), &SqlType::VarChar(8));
}

#[test]
fn builtin_values_round_trip_through_rows() {
    let table = EventTable::new();
    let id = uuid::Uuid::new_v4();
    let at = jiff::Timestamp::UNIX_EPOCH;

    let row = Row::new()
        .with("id", Value::Uuid(id))
        .with("at", Value::Timestamp(at))
        .with("level", Value::I16(3))
        .with("payload", Value::Bytes(vec![1, 2, 3]))
        .with("code", Value::String("AB".to_string()));

    let event = table.from_row(&row).unwrap();
    assert_eq!(event.id, id);
    assert_eq!(event.at, at);
    assert_eq!(event.level, 3);
    assert_eq!(event.payload, vec![1, 2, 3]);
    assert_eq!(event.note, None);
    assert_eq!(event.code, "AB");

    for column in table.columns() {
        let value = column.read(&event);
        match row.value(column.name()) {
            Some(expected) => assert_eq!(&value, expected),
            None => assert!(value.is_null()),
        }
    }
}

#[test]
fn missing_required_column_fails_materialization() {
    let table = EventTable::new();
    let row = Row::new().with("id", Value::Uuid(uuid::Uuid::new_v4()));

    let err = table.from_row(&row).unwrap_err();
    assert!(err.is_missing_value());
}
