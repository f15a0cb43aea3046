//! Shared API response types
//!
//! Timestamps are serialized as RFC 3339 strings.

use serde::{Deserialize, Serialize};

use crate::models::{Inquiry, Listing, PagedResult, Realtor};

// ============================================================================
// Listing Response Types
// ============================================================================

/// Listing as returned by the JSON endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ListingResponse {
    pub id: i64,
    pub realtor_id: i64,
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub description: String,
    pub price: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub sqft: i64,
    pub list_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtor: Option<RealtorInfo>,
}

/// Realtor contact details embedded in a listing detail response
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RealtorInfo {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub is_mvp: bool,
}

/// Paginated listing response
#[derive(Debug, Serialize)]
pub struct PaginatedListingsResponse {
    pub listings: Vec<ListingResponse>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Search results; search is not paginated
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub listings: Vec<ListingResponse>,
    pub total: usize,
}

// ============================================================================
// Inquiry Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct InquiryResponse {
    pub id: i64,
    pub listing_id: i64,
    pub listing: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub user_id: i64,
    pub contact_date: String,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            realtor_id: listing.realtor_id,
            title: listing.title,
            address: listing.address,
            city: listing.city,
            state: listing.state,
            zipcode: listing.zipcode,
            description: listing.description,
            price: listing.price,
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            sqft: listing.sqft,
            list_date: listing.list_date.to_rfc3339(),
            realtor: None,
        }
    }
}

impl ListingResponse {
    /// Add realtor contact details to the response
    pub fn with_realtor(mut self, realtor: Option<Realtor>) -> Self {
        self.realtor = realtor.map(|r| RealtorInfo {
            id: r.id,
            name: r.name,
            phone: r.phone,
            email: r.email,
            is_mvp: r.is_mvp,
        });
        self
    }
}

impl From<PagedResult<Listing>> for PaginatedListingsResponse {
    fn from(result: PagedResult<Listing>) -> Self {
        let total_pages = result.total_pages();
        let has_next = result.has_next();
        let has_prev = result.has_prev();
        Self {
            total: result.total,
            page: result.page,
            page_size: result.per_page,
            total_pages,
            has_next,
            has_prev,
            listings: result.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<Listing>> for SearchResponse {
    fn from(listings: Vec<Listing>) -> Self {
        Self {
            total: listings.len(),
            listings: listings.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Inquiry> for InquiryResponse {
    fn from(inquiry: Inquiry) -> Self {
        Self {
            id: inquiry.id,
            listing_id: inquiry.listing_id,
            listing: inquiry.listing,
            name: inquiry.name,
            email: inquiry.email,
            phone: inquiry.phone,
            message: inquiry.message,
            user_id: inquiry.user_id,
            contact_date: inquiry.contact_date.to_rfc3339(),
        }
    }
}
