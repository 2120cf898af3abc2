use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::result::DatabaseErrorKind;
use domain::DomainError;
use std::time::Duration;
use tracing::info;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const IN_MEMORY: &str = ":memory:";

/// Upper bound on ids bound into a single `IN (...)` clause. SQLite refuses
/// statements with more than 32,766 parameters, so id lists are split.
pub(crate) const BATCH_SIZE: usize = 500;

/// Per-connection settings applied whenever the pool hands out a connection.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// Owns the connection pool. Built once at startup, before any request is
/// served, and dropped after the server has drained.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(database_path: &str, pool_size: u32) -> Result<Self, DomainError> {
        let in_memory = database_path == IN_MEMORY;
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);

        let builder = r2d2::Pool::<ConnectionManager<SqliteConnection>>::builder().connection_customizer(
            Box::new(ConnectionOptions {
                busy_timeout: Duration::from_secs(5),
            }),
        );

        // Every connection to ":memory:" is a separate database, so the
        // pool keeps exactly one and never recycles it.
        let builder = if in_memory {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(pool_size.max(1))
        };

        let pool = builder.build(manager).map_err(|e| {
            DomainError::PersistenceError(format!("Failed to create SQLite connection pool: {}", e))
        })?;

        let database = Database { pool };
        database.initialize()?;
        info!(path = database_path, "database ready");
        Ok(database)
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        Self::new(IN_MEMORY, 1)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn initialize(&self) -> Result<(), DomainError> {
        let mut conn = self.pool.get().map_err(pool_error)?;
        conn.batch_execute(schema::CREATE_TABLES).map_err(query_error)
    }
}

/// SQLite's implicit rowid, used to list rows in the order they were written.
pub(crate) fn insertion_order() -> diesel::expression::SqlLiteral<diesel::sql_types::BigInt> {
    diesel::dsl::sql::<diesel::sql_types::BigInt>("rowid")
}

pub(crate) fn pool_error(e: r2d2::PoolError) -> DomainError {
    DomainError::PersistenceError(format!("connection unavailable: {}", e))
}

pub(crate) fn join_error(e: tokio::task::JoinError) -> DomainError {
    DomainError::PersistenceError(format!("database task failed: {}", e))
}

pub(crate) fn query_error(e: diesel::result::Error) -> DomainError {
    match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DomainError::Conflict(info.message().to_string())
        }
        other => DomainError::PersistenceError(other.to_string()),
    }
}

/// Identifiers read back from the store were written by us; a malformed one
/// means the data is corrupt, not that the caller sent a bad reference.
pub(crate) fn stored_id(raw: &str) -> Result<domain::EntityId, DomainError> {
    domain::EntityId::parse(raw)
        .map_err(|_| DomainError::PersistenceError(format!("corrupt identifier in store: {}", raw)))
}
