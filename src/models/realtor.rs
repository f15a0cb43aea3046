//! Realtor model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Realtor entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realtor {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Short biography
    pub description: String,
    /// Contact phone
    pub phone: String,
    /// Contact email, receives listing inquiries
    pub email: String,
    /// Seller of the month
    pub is_mvp: bool,
    /// When the realtor joined
    pub hire_date: DateTime<Utc>,
}

/// Input for creating a realtor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRealtorInput {
    pub name: String,
    pub description: String,
    pub phone: String,
    pub email: String,
    pub is_mvp: bool,
    /// Defaults to now when absent
    pub hire_date: Option<DateTime<Utc>>,
}

impl CreateRealtorInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            phone: String::new(),
            email: email.into(),
            is_mvp: false,
            hire_date: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_mvp(mut self, is_mvp: bool) -> Self {
        self.is_mvp = is_mvp;
        self
    }

    pub fn with_hire_date(mut self, hire_date: DateTime<Utc>) -> Self {
        self.hire_date = Some(hire_date);
        self
    }
}
