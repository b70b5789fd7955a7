use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("No database connection configured for log table '{table}'")]
    NoConnection { table: String },

    #[error("Failed to provision log table '{table}': {cause}")]
    Schema {
        table: String,
        cause: rusqlite::Error,
    },

    #[error("Failed to insert log record into '{table}': {cause}")]
    Statement {
        table: String,
        cause: rusqlite::Error,
    },
}

pub type Result<T> = std::result::Result<T, SinkError>;
