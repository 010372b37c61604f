use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub mod schema;
pub use schema::*;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Pooled connections write concurrently; without a busy timeout a second
/// writer fails immediately instead of waiting for the lock.
#[derive(Debug)]
struct ConnectionSettings;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionSettings {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the SQLite database and bring the schema up to date.
    pub fn new(database_path: &str) -> Self {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = r2d2::Pool::builder()
            .connection_customizer(Box::new(ConnectionSettings))
            .build(manager)
            .expect("Failed to create SQLite connection pool");

        let mut conn = pool
            .get()
            .expect("Failed to get connection for migrations");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run database migrations");

        Database { pool }
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
