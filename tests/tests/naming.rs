use ormlet::{NamingStrategy, Table};
use pretty_assertions::assert_eq;

/// Custom strategy type: not statically invocable, so the generated
/// initializers call it at runtime.
struct Loud;

impl NamingStrategy for Loud {
    fn table_name(&self, raw: &str) -> String {
        format!("T_{}", raw.to_uppercase())
    }

    fn column_name(&self, raw: &str) -> String {
        format!("c_{raw}")
    }
}

ormlet::schema! {
    #[database(naming = Loud)]
    struct Warehouse;

    #[entity]
    pub struct Visit {
        #[key]
        id: i64,
        page: String,
    }

    // Explicit overrides win over the configured strategy.
    #[entity]
    #[table("audit_log")]
    pub struct AuditEntry {
        #[key]
        #[column("entry_id")]
        id: i64,
        message: String,
    }

    // A table-local builtin strategy wins over the global one and applies
    // at generation time.
    #[entity]
    #[table(naming = upper_snake_case, accessor = lines)]
    pub struct OrderLine {
        #[key]
        id: i64,
        sku_code: String,
    }
}

#[test]
fn global_strategy_is_called_at_runtime() {
    let table = VisitTable::new();

    assert_eq!(table.descriptor().name(), "T_VISIT");
    assert_eq!(table.id.name(), "c_id");
    assert_eq!(table.page.name(), "c_page");
}

#[test]
fn explicit_overrides_win() {
    let table = AuditEntryTable::new();

    assert_eq!(table.descriptor().name(), "audit_log");
    assert_eq!(table.id.name(), "entry_id");
    // Only the overridden column escapes the strategy.
    assert_eq!(table.message.name(), "c_message");
}

#[test]
fn table_local_strategy_wins_over_global() {
    let table = OrderLineTable::new();

    assert_eq!(table.descriptor().name(), "ORDER_LINE");
    assert_eq!(table.sku_code.name(), "SKU_CODE");
}

#[test]
fn accessor_override_names_the_sequence() {
    let db = tests::db();
    let seq = lines(&db);
    assert_eq!(seq.table().descriptor().name(), "ORDER_LINE");
}

#[test]
fn alias_catalog_and_schema_carry_through() {
    ormlet::schema! {
        #[database]
        struct Inner;

        #[entity]
        #[table("events", alias = "e", catalog = "main", schema = "analytics")]
        pub struct Event {
            #[key]
            id: i64,
        }
    }

    let table = EventTable::new();
    assert_eq!(table.descriptor().alias_name(), Some("e"));
    assert_eq!(table.descriptor().catalog_name(), Some("main"));
    assert_eq!(table.descriptor().schema_name(), Some("analytics"));
    assert_eq!(table.descriptor().qualified_name(), "main.analytics.events");
}
