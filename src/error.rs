//! Error types for the data access layer

/// Result type alias using DatabaseError
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Every failure the data access layer can report
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// The store could not be opened or created
    #[error("failed to open database at {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Malformed SQL, missing table, constraint violation or busy store
    #[error("query failed: {source} (sql: {sql})")]
    Query {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// No row with the requested id
    #[error("no row with id {id} in table {table}")]
    NotFound { table: String, id: i64 },

    /// Table or column name rejected before it reached SQL text
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

impl DatabaseError {
    pub(crate) fn query(sql: &str, source: rusqlite::Error) -> Self {
        Self::Query {
            sql: sql.to_string(),
            source,
        }
    }

    /// True for the expected, non-exceptional "row is missing" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The underlying SQLite error, if any.
    pub fn sqlite_error(&self) -> Option<&rusqlite::Error> {
        match self {
            Self::Connection { source, .. } | Self::Query { source, .. } => Some(source),
            Self::NotFound { .. } | Self::InvalidIdentifier(_) => None,
        }
    }
}
