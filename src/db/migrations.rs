//! Embedded schema migrations
//!
//! Every migration carries SQL for both SQLite and MySQL and is compiled into
//! the binary. Applied versions are tracked in the `_migrations` table, so
//! `run_migrations` is safe to call on every start.

use anyhow::{Context, Result};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::DynDatabasePool;
use crate::config::DatabaseDriver;

/// A schema migration with SQL for both supported backends
#[derive(Debug, Clone)]
pub struct Migration {
    /// Unique, increasing version number
    pub version: i32,
    pub name: &'static str,
    pub up_sqlite: &'static str,
    pub up_mysql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_realtors",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS realtors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(200) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                phone VARCHAR(20) NOT NULL DEFAULT '',
                email VARCHAR(50) NOT NULL,
                is_mvp BOOLEAN NOT NULL DEFAULT 0,
                hire_date TIMESTAMP NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_realtors_hire_date ON realtors(hire_date);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS realtors (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(200) NOT NULL,
                description TEXT NOT NULL,
                phone VARCHAR(20) NOT NULL DEFAULT '',
                email VARCHAR(50) NOT NULL,
                is_mvp BOOLEAN NOT NULL DEFAULT FALSE,
                hire_date DATETIME NOT NULL
            );
            CREATE INDEX idx_realtors_hire_date ON realtors(hire_date);
        "#,
    },
    Migration {
        version: 2,
        name: "create_listings",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                realtor_id INTEGER NOT NULL,
                title VARCHAR(200) NOT NULL,
                address VARCHAR(200) NOT NULL DEFAULT '',
                city VARCHAR(100) NOT NULL DEFAULT '',
                state VARCHAR(100) NOT NULL DEFAULT '',
                zipcode VARCHAR(20) NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                price INTEGER NOT NULL,
                bedrooms INTEGER NOT NULL,
                bathrooms REAL NOT NULL DEFAULT 1,
                sqft INTEGER NOT NULL DEFAULT 0,
                is_published BOOLEAN NOT NULL DEFAULT 1,
                list_date TIMESTAMP NOT NULL,
                FOREIGN KEY (realtor_id) REFERENCES realtors(id) ON DELETE RESTRICT
            );
            CREATE INDEX IF NOT EXISTS idx_listings_published_date ON listings(is_published, list_date);
            CREATE INDEX IF NOT EXISTS idx_listings_realtor_id ON listings(realtor_id);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS listings (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                realtor_id BIGINT NOT NULL,
                title VARCHAR(200) NOT NULL,
                address VARCHAR(200) NOT NULL DEFAULT '',
                city VARCHAR(100) NOT NULL DEFAULT '',
                state VARCHAR(100) NOT NULL DEFAULT '',
                zipcode VARCHAR(20) NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                price BIGINT NOT NULL,
                bedrooms BIGINT NOT NULL,
                bathrooms DOUBLE NOT NULL DEFAULT 1,
                sqft BIGINT NOT NULL DEFAULT 0,
                is_published BOOLEAN NOT NULL DEFAULT TRUE,
                list_date DATETIME NOT NULL,
                FOREIGN KEY (realtor_id) REFERENCES realtors(id) ON DELETE RESTRICT
            );
            CREATE INDEX idx_listings_published_date ON listings(is_published, list_date);
        "#,
    },
    // Identified users get one inquiry per listing; user_id 0 is anonymous and
    // must stay unrestricted, hence the partial index / nullable generated key.
    Migration {
        version: 3,
        name: "create_contacts",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id INTEGER NOT NULL,
                listing VARCHAR(200) NOT NULL DEFAULT '',
                name VARCHAR(200) NOT NULL,
                email VARCHAR(100) NOT NULL,
                phone VARCHAR(100) NOT NULL DEFAULT '',
                message TEXT NOT NULL DEFAULT '',
                user_id INTEGER NOT NULL DEFAULT 0,
                contact_date TIMESTAMP NOT NULL,
                FOREIGN KEY (listing_id) REFERENCES listings(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_contacts_user_id ON contacts(user_id);
            CREATE UNIQUE INDEX IF NOT EXISTS uq_contacts_listing_user
                ON contacts(listing_id, user_id) WHERE user_id > 0;
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS contacts (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                listing_id BIGINT NOT NULL,
                listing VARCHAR(200) NOT NULL DEFAULT '',
                name VARCHAR(200) NOT NULL,
                email VARCHAR(100) NOT NULL,
                phone VARCHAR(100) NOT NULL DEFAULT '',
                message TEXT NOT NULL,
                user_id BIGINT NOT NULL DEFAULT 0,
                contact_date DATETIME NOT NULL,
                dedup_user_id BIGINT AS (IF(user_id > 0, user_id, NULL)) STORED,
                FOREIGN KEY (listing_id) REFERENCES listings(id) ON DELETE CASCADE,
                UNIQUE KEY uq_contacts_listing_user (listing_id, dedup_user_id)
            );
            CREATE INDEX idx_contacts_user_id ON contacts(user_id);
        "#,
    },
];

/// Apply every migration not yet recorded in `_migrations`.
///
/// Returns the number of migrations applied by this call.
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;
    let mut count = 0;

    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }
        tracing::info!(
            "Applying migration {}: {}",
            migration.version,
            migration.name
        );
        apply_migration(pool, migration)
            .await
            .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
        count += 1;
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

async fn applied_versions(pool: &DynDatabasePool) -> Result<Vec<i32>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => applied_versions_sqlite(pool.sqlite()?).await,
        DatabaseDriver::Mysql => applied_versions_mysql(pool.mysql()?).await,
    }
}

async fn applied_versions_sqlite(pool: &SqlitePool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    rows.iter()
        .map(|row| -> Result<i32> { Ok(row.try_get::<i64, _>("version")? as i32) })
        .collect()
}

async fn applied_versions_mysql(pool: &MySqlPool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    rows.iter()
        .map(|row| -> Result<i32> { Ok(row.try_get::<i32, _>("version")?) })
        .collect()
}

async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    match pool.driver() {
        DatabaseDriver::Sqlite => apply_migration_sqlite(pool.sqlite()?, migration).await,
        DatabaseDriver::Mysql => apply_migration_mysql(pool.mysql()?, migration).await,
    }
}

async fn apply_migration_sqlite(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in split_sql_statements(migration.up_sqlite) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

// MySQL commits DDL implicitly, so a transaction would buy nothing here.
async fn apply_migration_mysql(pool: &MySqlPool, migration: &Migration) -> Result<()> {
    for statement in split_sql_statements(migration.up_mysql) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((cut, _)) => format!("{}...", &sql[..cut]),
        None => sql.to_string(),
    }
}

/// Split a migration body on `;`, dropping empty and comment-only chunks
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty() && !is_comment_only(stmt))
        .collect()
}

fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

/// Number of migrations not yet applied
pub async fn pending_count(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;
    let applied = applied_versions(pool).await?;
    Ok(MIGRATIONS
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .count())
}
