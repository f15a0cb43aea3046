//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They own the
//! visibility rules (published only), inquiry validation and deduplication,
//! and turn storage failures into typed errors.

pub mod inquiry;
pub mod listing;
pub mod realtor;

pub use inquiry::{InquiryService, InquiryServiceError};
pub use listing::{ListingService, ListingServiceError};
pub use realtor::{RealtorService, RealtorServiceError};
