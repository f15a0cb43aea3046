//! Inquiry repository
//!
//! Inquiries live in the `contacts` table. The schema enforces at most one
//! row per (listing_id, user_id) when user_id > 0; an insert that breaks
//! that rule fails with a unique violation, detectable with
//! [`is_unique_violation`].

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateInquiryInput, Inquiry};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const INQUIRY_COLUMNS: &str =
    "id, listing_id, listing, name, email, phone, message, user_id, contact_date";

/// Inquiry repository trait
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Whether an inquiry exists for this listing and user
    async fn exists(&self, listing_id: i64, user_id: i64) -> Result<bool>;

    /// Store a new inquiry stamped with the current time
    async fn create(&self, input: &CreateInquiryInput) -> Result<Inquiry>;

    /// Inquiries made by one user, newest first
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Inquiry>>;

    /// Total stored inquiries
    async fn count(&self) -> Result<i64>;
}

/// Check whether an error chain bottoms out in a unique constraint failure
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// SQLx-based inquiry repository implementation
pub struct SqlxInquiryRepository {
    pool: DynDatabasePool,
}

impl SqlxInquiryRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn InquiryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl InquiryRepository for SqlxInquiryRepository {
    async fn exists(&self, listing_id: i64, user_id: i64) -> Result<bool> {
        let sql = "SELECT COUNT(*) as count FROM contacts WHERE listing_id = ? AND user_id = ?";
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(listing_id)
                .bind(user_id)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to check existing inquiry")?
                .try_get("count")?,
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(listing_id)
                .bind(user_id)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to check existing inquiry")?
                .try_get("count")?,
        };
        Ok(count > 0)
    }

    async fn create(&self, input: &CreateInquiryInput) -> Result<Inquiry> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_inquiry_sqlite(self.pool.sqlite()?, input).await,
            DatabaseDriver::Mysql => create_inquiry_mysql(self.pool.mysql()?, input).await,
        }
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Inquiry>> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE user_id = ? ORDER BY contact_date DESC, id DESC",
            INQUIRY_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .bind(user_id)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list inquiries by user")?;
                rows.iter().map(row_to_inquiry_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .bind(user_id)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list inquiries by user")?;
                rows.iter().map(row_to_inquiry_mysql).collect()
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        let sql = "SELECT COUNT(*) as count FROM contacts";
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to count inquiries")?
                .try_get("count")?,
            DatabaseDriver::Mysql => sqlx::query(sql)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to count inquiries")?
                .try_get("count")?,
        };
        Ok(count)
    }
}

const INSERT_INQUIRY: &str = r#"
    INSERT INTO contacts (listing_id, listing, name, email, phone, message, user_id, contact_date)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

// A unique violation is left as the underlying sqlx error so callers can
// tell a duplicate apart from other failures.
async fn create_inquiry_sqlite(pool: &SqlitePool, input: &CreateInquiryInput) -> Result<Inquiry> {
    let contact_date = Utc::now();
    let result = sqlx::query(INSERT_INQUIRY)
        .bind(input.listing_id)
        .bind(&input.listing)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.message)
        .bind(input.user_id)
        .bind(contact_date)
        .execute(pool)
        .await
        .context("Failed to create inquiry")?;

    Ok(inquiry_from_input(result.last_insert_rowid(), input, contact_date))
}

async fn create_inquiry_mysql(pool: &MySqlPool, input: &CreateInquiryInput) -> Result<Inquiry> {
    let contact_date = Utc::now();
    let result = sqlx::query(INSERT_INQUIRY)
        .bind(input.listing_id)
        .bind(&input.listing)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.message)
        .bind(input.user_id)
        .bind(contact_date)
        .execute(pool)
        .await
        .context("Failed to create inquiry")?;

    Ok(inquiry_from_input(result.last_insert_id() as i64, input, contact_date))
}

fn inquiry_from_input(
    id: i64,
    input: &CreateInquiryInput,
    contact_date: chrono::DateTime<Utc>,
) -> Inquiry {
    Inquiry {
        id,
        listing_id: input.listing_id,
        listing: input.listing.clone(),
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        message: input.message.clone(),
        user_id: input.user_id,
        contact_date,
    }
}

fn row_to_inquiry_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Inquiry> {
    Ok(Inquiry {
        id: row.try_get("id")?,
        listing_id: row.try_get("listing_id")?,
        listing: row.try_get("listing")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        message: row.try_get("message")?,
        user_id: row.try_get("user_id")?,
        contact_date: row.try_get("contact_date")?,
    })
}

fn row_to_inquiry_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Inquiry> {
    Ok(Inquiry {
        id: row.try_get("id")?,
        listing_id: row.try_get("listing_id")?,
        listing: row.try_get("listing")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        message: row.try_get("message")?,
        user_id: row.try_get("user_id")?,
        contact_date: row.try_get("contact_date")?,
    })
}
