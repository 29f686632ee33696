//! Transport schedule browser.
//!
//! Serves the data behind a schedule app's screens: city and station
//! pickers built from the all-stations listing, route search results with
//! client-side filters, carrier profiles and the story strip. Every list
//! screen is driven by the same load controller, which retries lost
//! connectivity with capped backoff and filters without refetching.

pub mod cache;
pub mod config;
pub mod controller;
pub mod domain;
pub mod rasp;
pub mod stations;
pub mod stories;
pub mod web;
