//! Data models
//!
//! This module contains the data structures used throughout the listing site:
//! - Database entities (Listing, Realtor, Inquiry)
//! - Search criteria and pagination types
//! - Boundary types for raw form/query input and their validation
//! - Fixed option lists for the search form

mod choices;
mod filter;
mod inquiry;
mod listing;
mod pagination;
mod realtor;
mod validation;

pub use choices::{Choice, SearchChoices, BEDROOM_CHOICES, PRICE_CHOICES, STATE_CHOICES};
pub use filter::{ListingFilter, SearchParams};
pub use inquiry::{ContactForm, CreateInquiryInput, Inquiry};
pub use listing::{sort_by_list_date, CreateListingInput, Listing};
pub use pagination::{ListParams, PageMeta, PagedResult};
pub use realtor::{CreateRealtorInput, Realtor};
pub use validation::ValidationError;
