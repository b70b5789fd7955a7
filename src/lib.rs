pub mod logger;
pub mod models;
pub mod sink;

pub use models::error::{Result, SinkError};
pub use models::record::{LogRecord, Severity};
pub use sink::sqlite::TableSink;
pub use sink::Sink;
