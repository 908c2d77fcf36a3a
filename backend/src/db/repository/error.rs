//! Error types for repository operations.
//!
//! Two kinds are fatal for a browsing session but never crash the process:
//! a missing database file and a failed schema check. Both carry a
//! user-facing message via [`RepositoryError::session_message`].

use std::fmt;
use std::path::PathBuf;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "open", "dso_records")
    pub operation: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn is_empty(&self) -> bool {
        self.operation.is_none() && self.details.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The configured SQLite file does not exist.
    #[error("Database file not found: {} {context}", .path.display())]
    DatabaseNotFound {
        path: PathBuf,
        context: ErrorContext,
    },

    /// Required tables or columns are missing.
    #[error("Schema check failed: {} {context}", .problems.join("; "))]
    SchemaMismatch {
        problems: Vec<String>,
        context: ErrorContext,
    },

    /// The database file exists but could not be opened.
    #[error("Connection error: {message} {context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// SQL query execution errors.
    #[error("Query error: {message} {context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn database_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DatabaseNotFound {
            path: path.into(),
            context: ErrorContext::new("open"),
        }
    }

    pub fn schema_mismatch(problems: Vec<String>) -> Self {
        Self::SchemaMismatch {
            problems,
            context: ErrorContext::new("validate_schema"),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Whether this error halts the browsing session (missing file or schema gap).
    pub fn is_session_fatal(&self) -> bool {
        matches!(
            self,
            Self::DatabaseNotFound { .. } | Self::SchemaMismatch { .. }
        )
    }

    /// Informational message shown in place of the result tables.
    pub fn session_message(&self) -> String {
        match self {
            Self::DatabaseNotFound { path, .. } => format!(
                "The file {} was not found. Update the configured path to point to your SQLite database.",
                path.display()
            ),
            Self::SchemaMismatch { problems, .. } => {
                format!("Schema check failed:\n\n- {}", problems.join("\n- "))
            }
            other => other.to_string(),
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::DatabaseNotFound { context, .. }
            | Self::SchemaMismatch { context, .. }
            | Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::ConfigurationError { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, message) => RepositoryError::QueryError {
                message: message.unwrap_or_else(|| code.to_string()),
                context: ErrorContext::default().with_details(format!("sqlite_code={:?}", code.code)),
            },
            other => RepositoryError::query(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_message_for_missing_file() {
        let err = RepositoryError::database_not_found("data/DSO.db");
        assert!(err.is_session_fatal());
        assert_eq!(
            err.session_message(),
            "The file data/DSO.db was not found. Update the configured path to point to your SQLite database."
        );
    }

    #[test]
    fn test_session_message_lists_every_problem() {
        let err = RepositoryError::schema_mismatch(vec![
            "Missing table: Stars".to_string(),
            "Missing column: \"Optimal\" in table Visibility".to_string(),
        ]);
        assert!(err.is_session_fatal());
        assert_eq!(
            err.session_message(),
            "Schema check failed:\n\n- Missing table: Stars\n- Missing column: \"Optimal\" in table Visibility"
        );
    }

    #[test]
    fn test_query_error_is_not_session_fatal() {
        let err = RepositoryError::query("no such column");
        assert!(!err.is_session_fatal());
        assert!(err.to_string().starts_with("Query error: no such column"));
    }

    #[test]
    fn test_with_operation_updates_context() {
        let err = RepositoryError::connection("store closed").with_operation("star_records");
        assert_eq!(
            err.to_string(),
            "Connection error: store closed [operation=star_records]"
        );
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("open").with_details("read-only");
        assert_eq!(ctx.to_string(), "[operation=open, details=read-only]");
        assert_eq!(ErrorContext::default().to_string(), "");
    }
}
