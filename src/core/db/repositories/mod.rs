//! Database repositories for FoodBridge
//!
//! This module provides repository implementations for database operations.
//! Repositories encapsulate data access logic and provide a clean API for
//! business logic to interact with the database.

pub mod analytics;
pub mod delivery;
pub mod donation;
pub mod profile;
pub mod role;
pub mod session;
pub mod user;

pub use analytics::{AnalyticsRepository, AnalyticsRepositoryError};
pub use delivery::{DeliveryRepository, DeliveryRepositoryError};
pub use donation::{DonationRepository, DonationRepositoryError};
pub use profile::{ProfileRepository, ProfileRepositoryError};
pub use role::{RoleRepository, RoleRepositoryError};
pub use session::{SessionRepository, SessionRepositoryError};
pub use user::{UserRepository, UserRepositoryError};
