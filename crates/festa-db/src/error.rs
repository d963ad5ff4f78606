use thiserror::Error;
use tokio_postgres::error::SqlState;

#[derive(Debug, Error)]
pub enum Error {
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("unknown migration version: {0}")]
    UnknownMigration(String),

    #[error("migration {version} has already been applied")]
    AlreadyApplied { version: String },

    #[error("migration {version} depends on {depends_on}, which has not been applied")]
    MissingDependency { version: String, depends_on: String },

    #[error("broken migration chain: {0}")]
    BrokenChain(String),

    #[error("duplicate row violates unique constraint {constraint}")]
    Duplicate { constraint: String },

    #[error("unknown target kind: {0}")]
    UnknownTargetKind(String),

    #[error("no {table} row with id {id}")]
    NotFound { table: &'static str, id: i64 },

    #[error("user {user} is not a participant of conversation {conversation}")]
    NotParticipant { conversation: i64, user: i64 },

    #[error("could not decode stored value: {0}")]
    Decode(String),

    #[error("schema mismatch:\n{0}")]
    SchemaMismatch(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a database error, surfacing unique-constraint violations as
    /// [`Error::Duplicate`] so callers can treat them as validation
    /// failures rather than infrastructure faults.
    pub fn from_db(err: tokio_postgres::Error) -> Self {
        if let Some(db) = err.as_db_error()
            && db.code() == &SqlState::UNIQUE_VIOLATION
        {
            return Error::Duplicate {
                constraint: db.constraint().unwrap_or("<unknown>").to_string(),
            };
        }
        Error::Postgres(err)
    }

    /// True if this error is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Duplicate { .. })
    }
}
