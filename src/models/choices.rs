//! Fixed option lists for the search form
//!
//! Each list is an ordered sequence of `(value, label)` pairs. The value is
//! what the form submits; the label is what the select shows.

use serde::Serialize;

pub const BEDROOM_CHOICES: &[(&str, &str)] = &[
    ("1", "1"),
    ("2", "2"),
    ("3", "3"),
    ("4", "4"),
    ("5", "5"),
    ("6", "6"),
    ("7", "7"),
    ("8", "8"),
    ("9", "9"),
    ("10", "10"),
];

pub const PRICE_CHOICES: &[(&str, &str)] = &[
    ("100000", "$100,000"),
    ("200000", "$200,000"),
    ("300000", "$300,000"),
    ("400000", "$400,000"),
    ("500000", "$500,000"),
    ("600000", "$600,000"),
    ("700000", "$700,000"),
    ("800000", "$800,000"),
    ("900000", "$900,000"),
    ("1000000", "$1M+"),
];

pub const STATE_CHOICES: &[(&str, &str)] = &[
    ("AK", "Alaska"),
    ("AL", "Alabama"),
    ("AR", "Arkansas"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DC", "District Of Columbia"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("IA", "Iowa"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MD", "Maryland"),
    ("ME", "Maine"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MO", "Missouri"),
    ("MS", "Mississippi"),
    ("MT", "Montana"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VA", "Virginia"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WI", "Wisconsin"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
];

/// A single select option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// All search form option lists, ready to hand to a template or serializer
#[derive(Debug, Clone, Serialize)]
pub struct SearchChoices {
    pub bedroom_choices: Vec<Choice>,
    pub price_choices: Vec<Choice>,
    pub state_choices: Vec<Choice>,
}

impl SearchChoices {
    pub fn new() -> Self {
        Self {
            bedroom_choices: to_choices(BEDROOM_CHOICES),
            price_choices: to_choices(PRICE_CHOICES),
            state_choices: to_choices(STATE_CHOICES),
        }
    }
}

impl Default for SearchChoices {
    fn default() -> Self {
        Self::new()
    }
}

fn to_choices(pairs: &[(&'static str, &'static str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|&(value, label)| Choice { value, label })
        .collect()
}
