//! Realtor repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateRealtorInput, Realtor};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const REALTOR_COLUMNS: &str = "id, name, description, phone, email, is_mvp, hire_date";

/// Realtor repository trait
#[async_trait]
pub trait RealtorRepository: Send + Sync {
    async fn create(&self, input: &CreateRealtorInput) -> Result<Realtor>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Realtor>>;

    /// All realtors, most recently hired first
    async fn list(&self) -> Result<Vec<Realtor>>;

    /// Realtors flagged as seller of the month, most recently hired first
    async fn list_mvp(&self) -> Result<Vec<Realtor>>;
}

/// SQLx-based realtor repository implementation
pub struct SqlxRealtorRepository {
    pool: DynDatabasePool,
}

impl SqlxRealtorRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn RealtorRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl RealtorRepository for SqlxRealtorRepository {
    async fn create(&self, input: &CreateRealtorInput) -> Result<Realtor> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_realtor_sqlite(self.pool.sqlite()?, input).await,
            DatabaseDriver::Mysql => create_realtor_mysql(self.pool.mysql()?, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Realtor>> {
        let sql = format!("SELECT {} FROM realtors WHERE id = ?", REALTOR_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get realtor by ID")?;
                row.as_ref().map(row_to_realtor_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get realtor by ID")?;
                row.as_ref().map(row_to_realtor_mysql).transpose()
            }
        }
    }

    async fn list(&self) -> Result<Vec<Realtor>> {
        self.list_where("1 = 1").await
    }

    async fn list_mvp(&self) -> Result<Vec<Realtor>> {
        self.list_where("is_mvp = 1").await
    }
}

impl SqlxRealtorRepository {
    async fn list_where(&self, condition: &str) -> Result<Vec<Realtor>> {
        let sql = format!(
            "SELECT {} FROM realtors WHERE {} ORDER BY hire_date DESC, id DESC",
            REALTOR_COLUMNS, condition
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list realtors")?;
                rows.iter().map(row_to_realtor_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list realtors")?;
                rows.iter().map(row_to_realtor_mysql).collect()
            }
        }
    }
}

const INSERT_REALTOR: &str = r#"
    INSERT INTO realtors (name, description, phone, email, is_mvp, hire_date)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

async fn create_realtor_sqlite(pool: &SqlitePool, input: &CreateRealtorInput) -> Result<Realtor> {
    let hire_date = input.hire_date.unwrap_or_else(Utc::now);
    let result = sqlx::query(INSERT_REALTOR)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.is_mvp)
        .bind(hire_date)
        .execute(pool)
        .await
        .context("Failed to create realtor")?;

    Ok(Realtor {
        id: result.last_insert_rowid(),
        name: input.name.clone(),
        description: input.description.clone(),
        phone: input.phone.clone(),
        email: input.email.clone(),
        is_mvp: input.is_mvp,
        hire_date,
    })
}

async fn create_realtor_mysql(pool: &MySqlPool, input: &CreateRealtorInput) -> Result<Realtor> {
    let hire_date = input.hire_date.unwrap_or_else(Utc::now);
    let result = sqlx::query(INSERT_REALTOR)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.is_mvp)
        .bind(hire_date)
        .execute(pool)
        .await
        .context("Failed to create realtor")?;

    Ok(Realtor {
        id: result.last_insert_id() as i64,
        name: input.name.clone(),
        description: input.description.clone(),
        phone: input.phone.clone(),
        email: input.email.clone(),
        is_mvp: input.is_mvp,
        hire_date,
    })
}

fn row_to_realtor_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Realtor> {
    Ok(Realtor {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        is_mvp: row.try_get("is_mvp")?,
        hire_date: row.try_get("hire_date")?,
    })
}

fn row_to_realtor_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Realtor> {
    Ok(Realtor {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        is_mvp: row.try_get("is_mvp")?,
        hire_date: row.try_get("hire_date")?,
    })
}
