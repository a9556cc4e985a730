//! Error types for the migration library.

use thiserror::Error;

/// Main error type for migration operations.
///
/// The four run-fatal kinds ([`SourceRead`](MigrateError::SourceRead),
/// [`Transform`](MigrateError::Transform), [`TargetWrite`](MigrateError::TargetWrite),
/// [`Commit`](MigrateError::Commit)) carry the table they occurred in so a
/// failed run reports the stage it reached. None of them are retried; the
/// only recovery is a full re-run after the root cause is fixed.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source database connection or query error
    #[error("Source database error: {0}")]
    Source(#[from] tiberius::error::Error),

    /// Target database connection or protocol error
    #[error("Target database error: {0}")]
    Target(#[from] tokio_postgres::Error),

    /// Connection pool error with context
    #[error("Pool error: {message}\n  Context: {context}")]
    Pool { message: String, context: String },

    /// A page fetch from the source failed for a specific table
    #[error("Source read failed for {table}: {message}")]
    SourceRead { table: &'static str, message: String },

    /// A source row could not be decoded into its entity shape
    #[error("Malformed source row in {table}: {message}")]
    MalformedRow { table: &'static str, message: String },

    /// Pseudonymization or record construction failed for a row
    #[error("Transform failed for {table} row '{id}': {message}")]
    Transform {
        table: &'static str,
        id: String,
        message: String,
    },

    /// A batch insert into the destination failed
    #[error("Destination write failed for {table}: {message}")]
    TargetWrite { table: &'static str, message: String },

    /// The final commit failed; nothing is visible in the destination
    #[error("Commit failed: {message}")]
    Commit { message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Migration was cancelled (SIGINT, etc.)
    #[error("Migration cancelled")]
    Cancelled,
}

impl MigrateError {
    /// Create a Pool error with context about where it occurred
    pub fn pool(message: impl Into<String>, context: impl Into<String>) -> Self {
        MigrateError::Pool {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create a SourceRead error for a table
    pub fn source_read(table: &'static str, message: impl ToString) -> Self {
        MigrateError::SourceRead {
            table,
            message: message.to_string(),
        }
    }

    /// Create a MalformedRow error for a table
    pub fn malformed_row(table: &'static str, message: impl Into<String>) -> Self {
        MigrateError::MalformedRow {
            table,
            message: message.into(),
        }
    }

    /// Create a Transform error for a row
    pub fn transform(
        table: &'static str,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        MigrateError::Transform {
            table,
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a TargetWrite error for a table
    pub fn target_write(table: &'static str, message: impl ToString) -> Self {
        MigrateError::TargetWrite {
            table,
            message: message.to_string(),
        }
    }

    /// Create a Commit error
    pub fn commit(message: impl ToString) -> Self {
        MigrateError::Commit {
            message: message.to_string(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) | MigrateError::Yaml(_) => 2,
            MigrateError::Cancelled => 130,
            _ => 1,
        }
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_identifies_table() {
        let err = MigrateError::target_write("AspNetUserClaims", "duplicate key");
        assert!(err.to_string().contains("AspNetUserClaims"));
        assert!(err.to_string().contains("duplicate key"));
    }

    #[test]
    fn test_transform_error_identifies_row() {
        let err = MigrateError::transform("AspNetUsers", "u42", "empty id");
        let text = err.to_string();
        assert!(text.contains("AspNetUsers"));
        assert!(text.contains("u42"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(MigrateError::Config("x".into()).exit_code(), 2);
        assert_eq!(MigrateError::Cancelled.exit_code(), 130);
        assert_eq!(MigrateError::commit("broken pipe").exit_code(), 1);
    }
}
