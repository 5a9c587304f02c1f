//! Connection pooling and blocking execution of Diesel queries.
//!
//! Diesel connections are synchronous, so every query is handed to tokio's blocking thread pool
//! instead of running on the reactor that drives Gotham's request handling.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, R2D2Connection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, error, trace};
use r2d2::{CustomizeConnection, Pool};
use thiserror::Error;

/// Schema migrations compiled into the binary, applied by `Repo::migrate`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// How long SQLite waits on a locked database before failing a statement.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The ways a database workload can fail.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection pool could not be created or could not hand out a connection in time.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Diesel rejected or failed to execute a query.
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// Applying the embedded schema migrations failed.
    #[error("migration failed: {0}")]
    Migration(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The blocking task running the query panicked or was cancelled.
    #[error("database task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A database "repository" for running database workloads against a pool of connections.
///
/// Cloning a `Repo` is cheap and every clone shares the same pool.
///
/// ```rust,no_run
/// # use product_crud::db::{Repo, StoreError};
/// # use diesel::prelude::*;
/// # async fn example() -> Result<(), StoreError> {
/// let repo = Repo::new("products.db")?;
/// repo.migrate()?;
///
/// let rows = repo
///     .run(|conn| {
///         use product_crud::schema::product::dsl::*;
///         product.count().get_result::<i64>(conn)
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Repo<T = SqliteConnection>
where
    T: R2D2Connection + 'static,
{
    connection_pool: AssertUnwindSafe<Pool<ConnectionManager<T>>>,
}

impl<T> Clone for Repo<T>
where
    T: R2D2Connection + 'static,
{
    fn clone(&self) -> Repo<T> {
        Repo {
            connection_pool: AssertUnwindSafe(self.connection_pool.0.clone()),
        }
    }
}

impl<T> Repo<T>
where
    T: R2D2Connection + 'static,
{
    /// Creates a repo from an already configured pool.
    pub fn with_pool(pool: Pool<ConnectionManager<T>>) -> Self {
        Repo {
            connection_pool: AssertUnwindSafe(pool),
        }
    }

    /// Runs the given closure on the blocking thread pool with a connection checked out of the
    /// pool, so that blocking IO does not stall the tokio reactor.
    pub async fn run<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut T) -> diesel::QueryResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let pool = self.connection_pool.0.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            trace!("checked out connection, {:?}", pool.state());
            f(&mut *conn).map_err(StoreError::from)
        })
        .await?
    }
}

impl Repo<SqliteConnection> {
    /// Creates a repo with default connection pool settings.
    ///
    /// Accepts a SQLite database path such as `products.db`, or `:memory:`.
    pub fn new(database_url: &str) -> Result<Self, StoreError> {
        Self::from_pool_builder(database_url, Pool::builder())
    }

    /// Creates a repo with a pool builder, allowing any pool configuration to be customized.
    /// Every connection the pool opens gets a busy timeout so concurrent writers queue up rather
    /// than failing with `database is locked`.
    pub fn from_pool_builder(
        database_url: &str,
        builder: r2d2::Builder<ConnectionManager<SqliteConnection>>,
    ) -> Result<Self, StoreError> {
        debug!("opening connection pool for {}", database_url);
        let manager = ConnectionManager::new(database_url);
        let pool = builder
            .connection_customizer(Box::new(SqliteConnectionOptions {
                busy_timeout: BUSY_TIMEOUT,
            }))
            .build(manager)?;
        Ok(Self::with_pool(pool))
    }

    /// Creates a repo over a private in-memory database with the schema already applied.
    ///
    /// Every SQLite in-memory connection is a distinct database, so the pool holds exactly one
    /// connection and never recycles it.
    pub fn in_memory() -> Result<Self, StoreError> {
        let builder = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None);
        let repo = Self::from_pool_builder(":memory:", builder)?;
        repo.migrate()?;
        Ok(repo)
    }

    /// Applies any pending embedded migrations. Blocks the calling thread.
    pub fn migrate(&self) -> Result<(), StoreError> {
        let mut pooled = self.connection_pool.0.get()?;
        let conn: &mut SqliteConnection = &mut pooled;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(StoreError::Migration)?;
        for version in applied {
            debug!("applied migration {}", version);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct SqliteConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let pragma = format!("PRAGMA busy_timeout = {};", self.busy_timeout.as_millis());
        conn.batch_execute(&pragma).map_err(|e| {
            error!("unable to configure sqlite connection: {}", e);
            diesel::r2d2::Error::QueryError(e)
        })
    }
}
