use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;

/// Fields a log table sink knows how to store, in insert-column order.
pub const DEFAULT_FIELDS: [&str; 8] = [
    "id",
    "channel",
    "level",
    "level_name",
    "trace",
    "payload",
    "message",
    "time",
];

/// An owned value bound to one insert placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Integer(i64),
    Text(String),
}

impl ToSql for ColumnValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            ColumnValue::Integer(i) => Ok(ToSqlOutput::from(*i)),
            ColumnValue::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
        }
    }
}

/// Filter a candidate row down to the columns that go into this write's
/// INSERT statement: recognized fields with non-null values, in candidate
/// order. The surviving set varies from call to call.
pub fn resolve_columns(
    candidates: Vec<(&'static str, Option<ColumnValue>)>,
) -> Vec<(&'static str, ColumnValue)> {
    candidates
        .into_iter()
        .filter(|(name, _)| DEFAULT_FIELDS.contains(name))
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
}
