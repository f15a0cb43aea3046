//! Inquiry (contact) model
//!
//! An inquiry is a message from a prospective buyer about one listing.
//! A positive `user_id` identifies a registered user; zero or below means
//! the inquiry was sent anonymously.
//!
//! Invariant: at most one inquiry per (listing, user) for identified users.
//! Anonymous inquiries are unrestricted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{non_blank, required, ValidationError};

/// Inquiry entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: i64,
    pub listing_id: i64,
    /// Listing title at the time of the inquiry
    pub listing: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    /// Requesting user, `0` for anonymous
    pub user_id: i64,
    pub contact_date: DateTime<Utc>,
}

impl Inquiry {
    /// Whether the inquiry was made without an account
    pub fn is_anonymous(&self) -> bool {
        self.user_id <= 0
    }
}

/// Input for creating an inquiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInquiryInput {
    pub listing_id: i64,
    pub listing: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: i64,
}

impl CreateInquiryInput {
    pub fn new(
        listing_id: i64,
        listing: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        user_id: i64,
    ) -> Self {
        Self {
            listing_id,
            listing: listing.into(),
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            message: String::new(),
            user_id,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Identified users are subject to deduplication
    pub fn is_anonymous(&self) -> bool {
        self.user_id <= 0
    }

    /// Check required fields, trimming them in place
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.listing_id <= 0 {
            return Err(ValidationError::new("listing_id", "must be a positive id"));
        }
        self.name = required("name", &self.name)?;
        self.email = required("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::new("email", "must be an email address"));
        }
        self.message = required("message", &self.message)?;
        self.phone = self.phone.trim().to_string();
        Ok(())
    }
}

/// Raw contact form as posted from the listing page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub listing_id: String,
    #[serde(default)]
    pub listing: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: String,
    /// Accepted for compatibility with the listing page form; mail delivery
    /// to the realtor is not performed.
    #[serde(default)]
    pub realtor_email: String,
}

impl TryFrom<ContactForm> for CreateInquiryInput {
    type Error = ValidationError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let listing_id = form
            .listing_id
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::new("listing_id", "must be a whole number"))?;

        // A blank user id comes from anonymous visitors
        let user_id = match non_blank(Some(&form.user_id)) {
            None => 0,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ValidationError::new("user_id", "must be a whole number"))?,
        };

        Ok(CreateInquiryInput {
            listing_id,
            listing: form.listing.trim().to_string(),
            name: form.name,
            email: form.email,
            phone: form.phone,
            message: form.message,
            user_id,
        })
    }
}
