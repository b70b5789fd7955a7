pub mod columns;
pub mod sqlite;

use crate::models::error::Result;
use crate::models::record::LogRecord;

/// A destination that persists log records.
///
/// Level filtering lives in `accepts`; chaining and propagation across
/// multiple sinks belong to the dispatcher, not the sink itself.
pub trait Sink: Send + Sync {
    /// Whether this sink wants the record at all.
    fn accepts(&self, record: &LogRecord) -> bool;

    /// Persist one record. Errors must surface to the caller; a sink never
    /// retries or swallows a failed delivery.
    fn write(&self, record: &LogRecord) -> Result<()>;

    /// When false, a dispatcher stops handing the record to later sinks
    /// after this one accepted it.
    fn bubble(&self) -> bool {
        true
    }
}
