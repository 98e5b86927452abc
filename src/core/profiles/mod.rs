//! Profile and role module
//!
//! Covers role selection during onboarding, contact profile management,
//! and monthly impact summaries.

pub mod api;

pub use api::{ProfileApiState, profile_api_router};
