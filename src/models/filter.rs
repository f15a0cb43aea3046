//! Listing search criteria
//!
//! `ListingFilter` is the request-scoped filter specification behind the
//! search page. Every present criterion narrows the result (AND), absent
//! criteria pass everything through:
//!
//! - `keywords`: case-insensitive substring of the description
//! - `city` / `state`: case-insensitive exact match
//! - `max_bedrooms` / `max_price`: inclusive upper bound
//!
//! The same specification is evaluated in memory here and translated to SQL
//! by the listing repository; both must agree.

use serde::{Deserialize, Serialize};

use super::listing::{sort_by_list_date, Listing};
use super::validation::{non_blank, parse_optional_int, ValidationError};

/// Search criteria for listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub keywords: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub max_bedrooms: Option<i64>,
    pub max_price: Option<i64>,
}

impl ListingFilter {
    /// Criteria that match everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_max_bedrooms(mut self, bedrooms: i64) -> Self {
        self.max_bedrooms = Some(bedrooms);
        self
    }

    pub fn with_max_price(mut self, price: i64) -> Self {
        self.max_price = Some(price);
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.keywords.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.max_bedrooms.is_none()
            && self.max_price.is_none()
    }

    /// Check a single listing against every present criterion
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(ref keywords) = self.keywords {
            if !listing
                .description
                .to_lowercase()
                .contains(&keywords.to_lowercase())
            {
                return false;
            }
        }
        if let Some(ref city) = self.city {
            if listing.city.to_lowercase() != city.to_lowercase() {
                return false;
            }
        }
        if let Some(ref state) = self.state {
            if listing.state.to_lowercase() != state.to_lowercase() {
                return false;
            }
        }
        if let Some(max_bedrooms) = self.max_bedrooms {
            if listing.bedrooms > max_bedrooms {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if listing.price > max_price {
                return false;
            }
        }
        true
    }

    /// Filter a base collection and order the result newest first
    pub fn apply<I>(&self, listings: I) -> Vec<Listing>
    where
        I: IntoIterator<Item = Listing>,
    {
        let mut matched: Vec<Listing> = listings
            .into_iter()
            .filter(|listing| self.matches(listing))
            .collect();
        sort_by_list_date(&mut matched);
        matched
    }
}

/// Raw search form values as submitted in the query string.
///
/// Echoed back to the template as `values` so the form keeps its state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

impl TryFrom<&SearchParams> for ListingFilter {
    type Error = ValidationError;

    fn try_from(params: &SearchParams) -> Result<Self, Self::Error> {
        Ok(ListingFilter {
            keywords: non_blank(params.keywords.as_deref()),
            city: non_blank(params.city.as_deref()),
            state: non_blank(params.state.as_deref()),
            max_bedrooms: parse_optional_int("bedrooms", params.bedrooms.as_deref())?,
            max_price: parse_optional_int("price", params.price.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn listing(id: i64, city: &str, state: &str, bedrooms: i64, price: i64, description: &str) -> Listing {
        Listing {
            id,
            realtor_id: 1,
            title: format!("Listing {}", id),
            address: format!("{} Main St", id),
            city: city.to_string(),
            state: state.to_string(),
            zipcode: "78701".to_string(),
            description: description.to_string(),
            price,
            bedrooms,
            bathrooms: 2.0,
            sqft: 1500,
            is_published: true,
            list_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(id),
        }
    }

    fn austin_listings() -> Vec<Listing> {
        vec![
            listing(1, "Austin", "TX", 2, 200_000, "Small bungalow"),
            listing(2, "Austin", "TX", 3, 300_000, "Family home with pool"),
            listing(3, "Austin", "TX", 4, 400_000, "Large house near the lake"),
            listing(4, "Dallas", "TX", 3, 250_000, "Condo downtown"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all_newest_first() {
        let result = ListingFilter::new().apply(austin_listings());
        let ids: Vec<i64> = result.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_city_and_bedrooms() {
        let filter = ListingFilter::new().with_city("Austin").with_max_bedrooms(3);
        let result = filter.apply(austin_listings());
        let ids: Vec<i64> = result.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_city_is_case_insensitive_exact() {
        let filter = ListingFilter::new().with_city("aUSTIN");
        assert_eq!(filter.apply(austin_listings()).len(), 3);

        let partial = ListingFilter::new().with_city("Aus");
        assert!(partial.apply(austin_listings()).is_empty());
    }

    #[test]
    fn test_state_is_case_insensitive_exact() {
        let filter = ListingFilter::new().with_state("tx");
        assert_eq!(filter.apply(austin_listings()).len(), 4);
    }

    #[test]
    fn test_keywords_substring_of_description() {
        let filter = ListingFilter::new().with_keywords("POOL");
        let result = filter.apply(austin_listings());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 2);
    }

    #[test]
    fn test_keywords_do_not_match_title() {
        let filter = ListingFilter::new().with_keywords("Listing");
        assert!(filter.apply(austin_listings()).is_empty());
    }

    #[test]
    fn test_price_is_inclusive() {
        let filter = ListingFilter::new().with_max_price(300_000);
        let ids: Vec<i64> = filter.apply(austin_listings()).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn test_search_params_blank_values_are_absent() {
        let params = SearchParams {
            keywords: Some("  ".to_string()),
            city: Some(String::new()),
            state: None,
            bedrooms: Some(String::new()),
            price: None,
        };
        let filter = ListingFilter::try_from(&params).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_search_params_parses_numbers() {
        let params = SearchParams {
            keywords: Some("pool".to_string()),
            city: Some(" Austin ".to_string()),
            state: Some("TX".to_string()),
            bedrooms: Some("3".to_string()),
            price: Some("500000".to_string()),
        };
        let filter = ListingFilter::try_from(&params).unwrap();
        assert_eq!(
            filter,
            ListingFilter::new()
                .with_keywords("pool")
                .with_city("Austin")
                .with_state("TX")
                .with_max_bedrooms(3)
                .with_max_price(500_000)
        );
    }

    #[test]
    fn test_search_params_rejects_non_numeric() {
        let params = SearchParams {
            price: Some("cheap".to_string()),
            ..Default::default()
        };
        let err = ListingFilter::try_from(&params).unwrap_err();
        assert_eq!(err.field, "price");
    }

    fn arb_listing() -> impl Strategy<Value = Listing> {
        (
            1i64..500,
            prop::sample::select(vec!["Austin", "austin", "Dallas", "Boston"]),
            prop::sample::select(vec!["TX", "tx", "MA"]),
            0i64..6,
            50_000i64..1_000_000,
            prop::sample::select(vec!["pool", "Garage", "big yard", "POOL and garage", ""]),
        )
            .prop_map(|(id, city, state, bedrooms, price, description)| {
                listing(id, city, state, bedrooms, price, description)
            })
    }

    fn arb_filter() -> impl Strategy<Value = ListingFilter> {
        (
            prop::option::of(prop::sample::select(vec!["pool", "garage", "yard"])),
            prop::option::of(prop::sample::select(vec!["Austin", "DALLAS", "Boston"])),
            prop::option::of(prop::sample::select(vec!["TX", "ma"])),
            prop::option::of(0i64..6),
            prop::option::of(50_000i64..1_000_000),
        )
            .prop_map(|(keywords, city, state, max_bedrooms, max_price)| ListingFilter {
                keywords: keywords.map(str::to_string),
                city: city.map(str::to_string),
                state: state.map(str::to_string),
                max_bedrooms,
                max_price,
            })
    }

    fn single_criteria(filter: &ListingFilter) -> Vec<ListingFilter> {
        let mut parts = Vec::new();
        if let Some(ref k) = filter.keywords {
            parts.push(ListingFilter::new().with_keywords(k.clone()));
        }
        if let Some(ref c) = filter.city {
            parts.push(ListingFilter::new().with_city(c.clone()));
        }
        if let Some(ref s) = filter.state {
            parts.push(ListingFilter::new().with_state(s.clone()));
        }
        if let Some(b) = filter.max_bedrooms {
            parts.push(ListingFilter::new().with_max_bedrooms(b));
        }
        if let Some(p) = filter.max_price {
            parts.push(ListingFilter::new().with_max_price(p));
        }
        parts
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The combined filter equals the intersection of single-criterion filters.
        #[test]
        fn property_filter_is_intersection(
            listings in prop::collection::vec(arb_listing(), 0..30),
            filter in arb_filter()
        ) {
            let combined: Vec<i64> = filter.apply(listings.clone()).iter().map(|l| l.id).collect();

            let parts = single_criteria(&filter);
            let expected: Vec<i64> = ListingFilter::new()
                .apply(listings.clone())
                .into_iter()
                .filter(|l| parts.iter().all(|p| p.matches(l)))
                .map(|l| l.id)
                .collect();

            prop_assert_eq!(combined, expected);
        }

        /// Narrowing sequentially in any order gives the same result as one pass.
        #[test]
        fn property_filter_order_independent(
            listings in prop::collection::vec(arb_listing(), 0..30),
            filter in arb_filter()
        ) {
            let parts = single_criteria(&filter);

            let mut forward = listings.clone();
            for part in &parts {
                forward = part.apply(forward);
            }
            let mut backward = listings.clone();
            for part in parts.iter().rev() {
                backward = part.apply(backward);
            }

            let direct = filter.apply(listings);
            let ids = |v: &[Listing]| v.iter().map(|l| l.id).collect::<Vec<_>>();
            prop_assert_eq!(ids(&forward), ids(&direct));
            prop_assert_eq!(ids(&backward), ids(&direct));
        }

        /// Results are ordered by list date descending.
        #[test]
        fn property_result_sorted(
            listings in prop::collection::vec(arb_listing(), 0..30),
            filter in arb_filter()
        ) {
            let result = filter.apply(listings);
            for pair in result.windows(2) {
                prop_assert!(pair[0].list_date >= pair[1].list_date);
            }
        }
    }
}
