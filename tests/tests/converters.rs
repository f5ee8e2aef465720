use ormlet::{Convert, FromValue, Row, SqlType, Table, Value};
use pretty_assertions::assert_eq;

ormlet::schema! {
    #[database(
        converters(MoneyConverter),
        default_enum_converter = RoleNameConverter,
        allow_default_construction,
    )]
    struct Shop;

    #[converter(Money, sql = bigint)]
    pub struct MoneyConverter;

    #[converter(factory, sql = varchar(16))]
    pub struct RoleNameConverter;

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Money {
        pub cents: i64,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Role {
        Admin,
        Member,
    }

    #[entity]
    #[derive(Debug, Clone, PartialEq)]
    pub struct Account {
        #[key]
        id: i64,
        balance: Money,
        tip: Option<Money>,
        role: Role,
        #[ignore]
        #[default(Money { cents: 0 })]
        pending: Money,
    }
}

impl Convert<Money> for MoneyConverter {
    fn to_value(&self, value: &Money) -> Value {
        Value::I64(value.cents)
    }

    fn from_value(&self, value: Value) -> ormlet::Result<Money> {
        Ok(Money {
            cents: i64::from_value(value)?,
        })
    }
}

impl Convert<Role> for RoleNameConverter {
    fn to_value(&self, value: &Role) -> Value {
        let name = match value {
            Role::Admin => "Admin",
            Role::Member => "Member",
        };
        Value::String(name.to_string())
    }

    fn from_value(&self, value: Value) -> ormlet::Result<Role> {
        match String::from_value(value)?.as_str() {
            "Admin" => Ok(Role::Admin),
            "Member" => Ok(Role::Member),
            _ => Err(ormlet::Error::type_conversion("role", "string")),
        }
    }
}

#[test]
fn converted_columns_use_the_converter_storage_type() {
    let table = AccountTable::new();

    assert_eq!(table.balance.sql_type(), &SqlType::BigInt);
    assert_eq!(table.tip.sql_type(), &SqlType::BigInt);
    // The enum column went through the default enum converter.
    assert_eq!(table.role.sql_type(), &SqlType::VarChar(16));
    // The ignored field resolved no column at all.
    assert_eq!(table.columns().len(), 4);
}

#[test]
fn converted_columns_round_trip() {
    let table = AccountTable::new();

    let row = Row::new()
        .with("id", Value::I64(1))
        .with("balance", Value::I64(250))
        .with("tip", Value::Null)
        .with("role", Value::String("Member".to_string()));

    let account = table.from_row(&row).unwrap();
    assert_eq!(account.balance, Money { cents: 250 });
    assert_eq!(account.tip, None);
    assert_eq!(account.role, Role::Member);
    // The unmapped field fell back to its declared default.
    assert_eq!(account.pending, Money { cents: 0 });

    // Bindings encode back through the converters.
    assert_eq!(table.balance.read(&account), Value::I64(250));
    assert_eq!(table.tip.read(&account), Value::Null);
    assert_eq!(table.role.read(&account), Value::String("Member".to_string()));
}

#[test]
fn nullable_converted_column_reads_back_present_values() {
    let table = AccountTable::new();

    let row = Row::new()
        .with("id", Value::I64(2))
        .with("balance", Value::I64(100))
        .with("tip", Value::I64(15))
        .with("role", Value::String("Admin".to_string()));

    let account = table.from_row(&row).unwrap();
    assert_eq!(account.tip, Some(Money { cents: 15 }));
    assert_eq!(table.tip.read(&account), Value::I64(15));
}
