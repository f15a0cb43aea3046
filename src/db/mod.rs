//! Database layer
//!
//! SQLite is the default backend (single file, no server); MySQL is
//! selected through `database.driver` for larger deployments. Everything
//! above this module talks to `DynDatabasePool` and the repository traits.
//!
//! ```ignore
//! use realty::config::DatabaseConfig;
//! use realty::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
