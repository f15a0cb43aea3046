//! Listing repository
//!
//! - `ListingRepository` trait defining listing data access
//! - `SqlxListingRepository` implementing it for SQLite and MySQL
//!
//! Search translates a `ListingFilter` into a WHERE clause. The translation
//! must select exactly what `ListingFilter::matches` accepts, ordered the way
//! `sort_by_list_date` orders (newest first, then highest id). SQLite only
//! lowercases ASCII, so non-ASCII text criteria are matched in memory there.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreateListingInput, Listing, ListingFilter};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

const LISTING_COLUMNS: &str = "id, realtor_id, title, address, city, state, zipcode, description, \
     price, bedrooms, bathrooms, sqft, is_published, list_date";

/// Listing repository trait
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Create a new listing
    async fn create(&self, input: &CreateListingInput) -> Result<Listing>;

    /// Get listing by ID regardless of publication state
    async fn get_by_id(&self, id: i64) -> Result<Option<Listing>>;

    /// One page of published listings, newest first
    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<Listing>>;

    /// Count published listings
    async fn count_published(&self) -> Result<i64>;

    /// The `limit` most recently listed published listings
    async fn latest_published(&self, limit: i64) -> Result<Vec<Listing>>;

    /// All published listings matching the filter, newest first
    async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>>;
}

/// SQLx-based listing repository implementation
pub struct SqlxListingRepository {
    pool: DynDatabasePool,
}

impl SqlxListingRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ListingRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ListingRepository for SqlxListingRepository {
    async fn create(&self, input: &CreateListingInput) -> Result<Listing> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_listing_sqlite(self.pool.sqlite()?, input).await,
            DatabaseDriver::Mysql => create_listing_mysql(self.pool.mysql()?, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Listing>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_listing_by_id_sqlite(self.pool.sqlite()?, id).await,
            DatabaseDriver::Mysql => get_listing_by_id_mysql(self.pool.mysql()?, id).await,
        }
    }

    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<Listing>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_published_sqlite(self.pool.sqlite()?, offset, limit).await
            }
            DatabaseDriver::Mysql => list_published_mysql(self.pool.mysql()?, offset, limit).await,
        }
    }

    async fn count_published(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_published_sqlite(self.pool.sqlite()?).await,
            DatabaseDriver::Mysql => count_published_mysql(self.pool.mysql()?).await,
        }
    }

    async fn latest_published(&self, limit: i64) -> Result<Vec<Listing>> {
        self.list_published(0, limit).await
    }

    async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite if !text_criteria_ascii(filter) => {
                // SQLite's LOWER folds ASCII only; match the text criteria here
                let (sql, args) = search_query(&without_text_criteria(filter));
                let mut listings = search_sqlite(self.pool.sqlite()?, &sql, args).await?;
                listings.retain(|listing| filter.matches(listing));
                Ok(listings)
            }
            DatabaseDriver::Sqlite => {
                let (sql, args) = search_query(filter);
                search_sqlite(self.pool.sqlite()?, &sql, args).await
            }
            DatabaseDriver::Mysql => {
                let (sql, args) = search_query(filter);
                search_mysql(self.pool.mysql()?, &sql, args).await
            }
        }
    }
}

// ============================================================================
// Search query construction (shared, both backends use `?` placeholders)
// ============================================================================

/// A value bound to one search placeholder
#[derive(Debug, Clone, PartialEq)]
enum SearchArg {
    Text(String),
    Int(i64),
}

/// Escape character for LIKE patterns; `\` would need doubling on MySQL.
const LIKE_ESCAPE: char = '!';

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn text_criteria_ascii(filter: &ListingFilter) -> bool {
    [&filter.keywords, &filter.city, &filter.state]
        .into_iter()
        .flatten()
        .all(|value| value.is_ascii())
}

fn without_text_criteria(filter: &ListingFilter) -> ListingFilter {
    ListingFilter {
        keywords: None,
        city: None,
        state: None,
        ..filter.clone()
    }
}

fn search_query(filter: &ListingFilter) -> (String, Vec<SearchArg>) {
    let mut clauses = vec!["is_published = 1".to_string()];
    let mut args = Vec::new();

    if let Some(ref keywords) = filter.keywords {
        clauses.push(format!("LOWER(description) LIKE ? ESCAPE '{}'", LIKE_ESCAPE));
        args.push(SearchArg::Text(format!(
            "%{}%",
            escape_like(&keywords.to_lowercase())
        )));
    }
    if let Some(ref city) = filter.city {
        clauses.push("LOWER(city) = ?".to_string());
        args.push(SearchArg::Text(city.to_lowercase()));
    }
    if let Some(ref state) = filter.state {
        clauses.push("LOWER(state) = ?".to_string());
        args.push(SearchArg::Text(state.to_lowercase()));
    }
    if let Some(max_bedrooms) = filter.max_bedrooms {
        clauses.push("bedrooms <= ?".to_string());
        args.push(SearchArg::Int(max_bedrooms));
    }
    if let Some(max_price) = filter.max_price {
        clauses.push("price <= ?".to_string());
        args.push(SearchArg::Int(max_price));
    }

    let sql = format!(
        "SELECT {} FROM listings WHERE {} ORDER BY list_date DESC, id DESC",
        LISTING_COLUMNS,
        clauses.join(" AND ")
    );
    (sql, args)
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_listing_sqlite(pool: &SqlitePool, input: &CreateListingInput) -> Result<Listing> {
    let list_date = input.list_date.unwrap_or_else(Utc::now);

    let result = sqlx::query(
        r#"
        INSERT INTO listings (realtor_id, title, address, city, state, zipcode, description,
            price, bedrooms, bathrooms, sqft, is_published, list_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.realtor_id)
    .bind(&input.title)
    .bind(&input.address)
    .bind(&input.city)
    .bind(&input.state)
    .bind(&input.zipcode)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.bedrooms)
    .bind(input.bathrooms)
    .bind(input.sqft)
    .bind(input.is_published)
    .bind(list_date)
    .execute(pool)
    .await
    .context("Failed to create listing")?;

    get_listing_by_id_sqlite(pool, result.last_insert_rowid())
        .await?
        .context("Listing vanished after insert")
}

async fn get_listing_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Listing>> {
    let sql = format!("SELECT {} FROM listings WHERE id = ?", LISTING_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get listing by ID")?;

    row.as_ref().map(row_to_listing_sqlite).transpose()
}

async fn list_published_sqlite(pool: &SqlitePool, offset: i64, limit: i64) -> Result<Vec<Listing>> {
    let sql = format!(
        "SELECT {} FROM listings WHERE is_published = 1 \
         ORDER BY list_date DESC, id DESC LIMIT ? OFFSET ?",
        LISTING_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list published listings")?;

    rows.iter().map(row_to_listing_sqlite).collect()
}

async fn count_published_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM listings WHERE is_published = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count published listings")?;

    Ok(row.get("count"))
}

async fn search_sqlite(pool: &SqlitePool, sql: &str, args: Vec<SearchArg>) -> Result<Vec<Listing>> {
    let mut query = sqlx::query(sql);
    for arg in args {
        query = match arg {
            SearchArg::Text(value) => query.bind(value),
            SearchArg::Int(value) => query.bind(value),
        };
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to search listings")?;

    rows.iter().map(row_to_listing_sqlite).collect()
}

fn row_to_listing_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Listing> {
    Ok(Listing {
        id: row.try_get("id")?,
        realtor_id: row.try_get("realtor_id")?,
        title: row.try_get("title")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zipcode: row.try_get("zipcode")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        sqft: row.try_get("sqft")?,
        is_published: row.try_get("is_published")?,
        list_date: row.try_get("list_date")?,
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_listing_mysql(pool: &MySqlPool, input: &CreateListingInput) -> Result<Listing> {
    let list_date = input.list_date.unwrap_or_else(Utc::now);

    let result = sqlx::query(
        r#"
        INSERT INTO listings (realtor_id, title, address, city, state, zipcode, description,
            price, bedrooms, bathrooms, sqft, is_published, list_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.realtor_id)
    .bind(&input.title)
    .bind(&input.address)
    .bind(&input.city)
    .bind(&input.state)
    .bind(&input.zipcode)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.bedrooms)
    .bind(input.bathrooms)
    .bind(input.sqft)
    .bind(input.is_published)
    .bind(list_date)
    .execute(pool)
    .await
    .context("Failed to create listing")?;

    get_listing_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .context("Listing vanished after insert")
}

async fn get_listing_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Listing>> {
    let sql = format!("SELECT {} FROM listings WHERE id = ?", LISTING_COLUMNS);
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get listing by ID")?;

    row.as_ref().map(row_to_listing_mysql).transpose()
}

async fn list_published_mysql(pool: &MySqlPool, offset: i64, limit: i64) -> Result<Vec<Listing>> {
    let sql = format!(
        "SELECT {} FROM listings WHERE is_published = 1 \
         ORDER BY list_date DESC, id DESC LIMIT ? OFFSET ?",
        LISTING_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list published listings")?;

    rows.iter().map(row_to_listing_mysql).collect()
}

async fn count_published_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM listings WHERE is_published = 1")
        .fetch_one(pool)
        .await
        .context("Failed to count published listings")?;

    Ok(row.get("count"))
}

async fn search_mysql(pool: &MySqlPool, sql: &str, args: Vec<SearchArg>) -> Result<Vec<Listing>> {
    let mut query = sqlx::query(sql);
    for arg in args {
        query = match arg {
            SearchArg::Text(value) => query.bind(value),
            SearchArg::Int(value) => query.bind(value),
        };
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to search listings")?;

    rows.iter().map(row_to_listing_mysql).collect()
}

fn row_to_listing_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Listing> {
    Ok(Listing {
        id: row.try_get("id")?,
        realtor_id: row.try_get("realtor_id")?,
        title: row.try_get("title")?,
        address: row.try_get("address")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zipcode: row.try_get("zipcode")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        bedrooms: row.try_get("bedrooms")?,
        bathrooms: row.try_get("bathrooms")?,
        sqft: row.try_get("sqft")?,
        is_published: row.try_get("is_published")?,
        list_date: row.try_get("list_date")?,
    })
}
