use crate::models::error::{Result, SinkError};
use crate::models::record::{LogRecord, Severity};
use crate::sink::columns::{resolve_columns, ColumnValue};
use crate::sink::Sink;
use base64::engine::general_purpose::STANDARD as B64_ENGINE;
use base64::Engine;
use log::warn;
use rusqlite::Connection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink that persists log records as rows of a SQL table, creating the
/// table and its indexes on first write.
///
/// The connection is supplied at construction and outlives the sink. A sink
/// without a connection fails every write with `SinkError::NoConnection`
/// instead of crashing. The insert statement is rebuilt per call, so the
/// only shared mutable state is the connection itself, guarded by a mutex.
pub struct TableSink {
    conn: Option<Mutex<Connection>>,
    table: String,
    min_severity: Severity,
    bubble: bool,
    initialized: AtomicBool,
}

impl TableSink {
    /// The table name is used verbatim in generated SQL; callers are trusted
    /// not to pass hostile identifiers.
    pub fn new(
        conn: Option<Connection>,
        table: impl Into<String>,
        min_severity: Severity,
        bubble: bool,
    ) -> Self {
        TableSink {
            conn: conn.map(Mutex::new),
            table: table.into(),
            min_severity,
            bubble,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the log table and its indexes if they do not exist yet.
    ///
    /// SQLite does not enforce VARCHAR lengths, so the column capacities are
    /// backed by CHECK constraints; an oversized value errors instead of
    /// being silently truncated.
    fn provision(&self, conn: &Connection) -> Result<()> {
        let table = &self.table;
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
    id VARCHAR(30) PRIMARY KEY NOT NULL CHECK (length(id) <= 30),
    channel VARCHAR(60) NOT NULL CHECK (length(channel) <= 60),
    level INT NOT NULL,
    level_name VARCHAR(10) NOT NULL CHECK (length(level_name) <= 10),
    message VARCHAR(250) NOT NULL CHECK (length(message) <= 250),
    trace TEXT,
    payload TEXT,
    time DATETIME DEFAULT CURRENT_TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS {table}_channel_index ON {table} (channel);
CREATE INDEX IF NOT EXISTS {table}_level_index ON {table} (level);
CREATE INDEX IF NOT EXISTS {table}_time_index ON {table} (time);"
        );

        conn.execute_batch(&ddl)
            .map_err(|cause| SinkError::Schema {
                table: self.table.clone(),
                cause,
            })
    }

    /// Fresh row id: base64 of the 16 raw bytes of a random UUID. 24
    /// characters, within the 30-character column capacity. Never the
    /// hyphenated UUID form.
    fn generate_id() -> String {
        B64_ENGINE.encode(Uuid::new_v4().as_bytes())
    }
}

impl Sink for TableSink {
    fn accepts(&self, record: &LogRecord) -> bool {
        record.severity >= self.min_severity
    }

    fn write(&self, record: &LogRecord) -> Result<()> {
        let conn = self.conn.as_ref().ok_or_else(|| SinkError::NoConnection {
            table: self.table.clone(),
        })?;

        // Single-flight provisioning, check-and-run under the connection
        // lock so no write can reach its insert before the DDL finished.
        // The flag is set before the DDL runs: schema creation is
        // best-effort and never retried on later writes, and the insert's
        // own error is the reliable failure signal.
        let provision_err = {
            let guard = conn.lock().unwrap();
            if !self.initialized.swap(true, Ordering::SeqCst) {
                self.provision(&guard).err()
            } else {
                None
            }
        };
        // Reported outside the lock: a chained logger may re-enter this sink.
        if let Some(err) = provision_err {
            warn!("{}", err);
        }

        let candidates = vec![
            ("id", Some(ColumnValue::Text(Self::generate_id()))),
            ("channel", Some(ColumnValue::Text(record.channel.clone()))),
            ("level", Some(ColumnValue::Integer(record.severity.code()))),
            (
                "level_name",
                Some(ColumnValue::Text(record.severity.name().to_string())),
            ),
            (
                "trace",
                record.trace().map(|t| ColumnValue::Text(t.to_string())),
            ),
            (
                "payload",
                record.payload().map(|v| ColumnValue::Text(v.to_string())),
            ),
            ("message", Some(ColumnValue::Text(record.message.clone()))),
            (
                "time",
                Some(ColumnValue::Text(
                    record.timestamp.format(TIME_FORMAT).to_string(),
                )),
            ),
        ];

        let resolved = resolve_columns(candidates);
        let column_list = resolved
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholder_list = (1..=resolved.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table, column_list, placeholder_list
        );

        let conn = conn.lock().unwrap();
        conn.execute(
            &sql,
            rusqlite::params_from_iter(resolved.iter().map(|(_, value)| value)),
        )
        .map_err(|cause| SinkError::Statement {
            table: self.table.clone(),
            cause,
        })?;

        Ok(())
    }

    fn bubble(&self) -> bool {
        self.bubble
    }
}
