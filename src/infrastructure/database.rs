//! Pooled SQLite connection

use di::inject;
use di::injectable;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::ops::{Deref, DerefMut};
use std::sync::RwLock;

/// Global pool override for integration tests.
///
/// The `more-di` framework constructs `DatabaseConnection` itself, so tests
/// cannot hand it a pre-built in-memory pool directly. Tests set one here and
/// `create()` picks it up instead of reading `DATABASE_URL`.
static TEST_POOL: RwLock<Option<SqlitePool>> = RwLock::new(None);

pub struct DatabaseConnection {
    connection: SqlitePool,
}

#[injectable]
impl DatabaseConnection {
    #[inject]
    pub fn create() -> DatabaseConnection {
        if let Some(pool) = TEST_POOL.read().expect("test pool lock poisoned").clone() {
            return DatabaseConnection { connection: pool };
        }

        dotenvy::dotenv().ok();
        let connection_string = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy(&connection_string)
            .expect("Cannot connect to database");

        DatabaseConnection { connection: pool }
    }

    pub fn set_test_pool(pool: SqlitePool) {
        *TEST_POOL.write().expect("test pool lock poisoned") = Some(pool);
    }

    pub fn clear_test_pool() {
        *TEST_POOL.write().expect("test pool lock poisoned") = None;
    }
}

impl Deref for DatabaseConnection {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}

impl DerefMut for DatabaseConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.connection
    }
}
