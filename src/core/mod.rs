//! Core domain types and business logic for the donation platform

#[cfg(feature = "ssr")]
pub mod auth;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod db;
#[cfg(feature = "ssr")]
pub mod deliveries;
#[cfg(feature = "ssr")]
pub mod donations;
#[cfg(feature = "ssr")]
pub mod profiles;

mod domain;

pub use domain::*;
