//! Error types for the data-access layer.
//!
//! All fallible operations in this crate return [`DalResult`]. Driver-level
//! failures are wrapped in [`Error::Query`] with the original driver message
//! preserved for diagnostics; the core performs no retries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Pool creation or startup health check failed. Fatal: the process must
    /// not serve traffic after this.
    #[error("Connection failed: {message}")]
    Connection { message: String },

    /// A direct-query path received blank SQL. Rejected before dispatch.
    #[error("Query is empty")]
    EmptyQuery,

    /// Any execution failure from the driver: syntax, constraint violation,
    /// connectivity mid-flight.
    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// e.g. "23000" for a duplicate key
        sql_state: Option<String>,
    },

    /// Malformed builder input: empty bulk slice, empty field map, empty
    /// column name.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Domain-level convenience for consumers. The core itself never raises
    /// this; single-row lookups return `None` instead.
    #[error("{entity} not found")]
    NotFound { entity: String },
}

impl Error {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with optional SQLSTATE code.
    pub fn query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a not-found error for a consumer-level lookup.
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Get the SQLSTATE code for this error, if the driver reported one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Query { sql_state, .. } => sql_state.as_deref(),
            _ => None,
        }
    }
}

/// Convert sqlx errors to Error.
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => Error::connection(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                Error::query(db_err.message(), code)
            }
            sqlx::Error::PoolTimedOut => Error::connection("Connection pool acquire timed out"),
            sqlx::Error::PoolClosed => Error::connection("Connection pool is closed"),
            sqlx::Error::Io(io_err) => Error::connection(format!("I/O error: {}", io_err)),
            sqlx::Error::Tls(tls_err) => Error::connection(format!("TLS error: {}", tls_err)),
            sqlx::Error::Protocol(msg) => Error::connection(format!("Protocol error: {}", msg)),
            other => Error::query(other.to_string(), None),
        }
    }
}

/// Result type alias for data-access operations.
pub type DalResult<T> = Result<T, Error>;
