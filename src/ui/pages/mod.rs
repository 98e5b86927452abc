//! Application pages module
//!
//! This module contains all the page components for the application:
//! - Landing page (home)
//! - Auth page (sign in / sign up)
//! - Role selection page (one-time onboarding)
//! - Donor, NGO, and volunteer dashboards

mod auth;
mod donor_dashboard;
mod landing;
mod ngo_dashboard;
mod not_found;
mod select_role;
mod shell;
mod volunteer_dashboard;

pub use auth::AuthPage;
pub use donor_dashboard::DonorDashboardPage;
pub use landing::LandingPage;
pub use ngo_dashboard::NgoDashboardPage;
pub use not_found::NotFoundPage;
pub use select_role::SelectRolePage;
pub use volunteer_dashboard::VolunteerDashboardPage;
