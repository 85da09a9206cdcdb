//! Concert listing for a single city.
//!
//! Events come from a hosted PostgREST backend, are narrowed down by the
//! visitor's criteria and turned into cards. A separate binary serves the
//! sitemap.

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod events;
pub mod favorites;
pub mod listing;
pub mod sitemap;
pub mod slug;
pub mod tracing;
