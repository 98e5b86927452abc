//! Delivery tracking module
//!
//! Covers volunteer claims, pickup/delivery stamping, and ratings.

pub mod api;

pub use api::{DeliveryApiState, delivery_api_router};
