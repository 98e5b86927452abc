//! Donation management module
//!
//! Covers the donation lifecycle from posting through acceptance and
//! cancellation, plus NGO donation requests and dashboard counters.

pub mod api;

pub use api::{DonationApiState, donation_api_router};
