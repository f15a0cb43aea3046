//! Realty - A small real-estate listing website
//!
//! Visitors browse and search published property listings, read a listing's
//! details and send an inquiry to its realtor. Pages are rendered with Tera;
//! the same data is available as JSON under `/api/v1`.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
pub mod web;
