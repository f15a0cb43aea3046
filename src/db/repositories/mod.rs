//! Database repositories
//!
//! One repository per entity. Services depend on the traits; the `Sqlx*`
//! implementations dispatch to SQLite or MySQL by pool driver.

pub mod inquiry;
pub mod listing;
pub mod realtor;

pub use inquiry::{is_unique_violation, InquiryRepository, SqlxInquiryRepository};
pub use listing::{ListingRepository, SqlxListingRepository};
pub use realtor::{RealtorRepository, SqlxRealtorRepository};
