//! Database models for FoodBridge
//!
//! This module defines the database entity structs that map to PostgreSQL tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{DeliveryStatus, DonationStatus, FoodCategory, UserRole};

// ============================================================================
// User Model
// ============================================================================

/// User entity representing a registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User without sensitive data (for API responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Session Model
// ============================================================================

/// Session entity for refresh tokens
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Profile Model
// ============================================================================

/// Contact and address extension of a user
///
/// The row is created together with the user; contact fields are filled
/// in later from the profile form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data for updates
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfile {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub avatar_url: Option<String>,
}

// ============================================================================
// User Role Model
// ============================================================================

/// A user's role assignment, set once during onboarding
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRoleRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Donation Model
// ============================================================================

/// Donation entity representing a posted food item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub food_category: FoodCategory,
    pub quantity: String,
    pub unit: Option<String>,
    pub expire_at: DateTime<Utc>,
    pub prepared_at: Option<DateTime<Utc>>,
    pub pickup_address: String,
    pub pickup_city: String,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub food_image_url: Option<String>,
    pub quality_notes: Option<String>,
    pub temperature_indicator: Option<String>,
    pub status: DonationStatus,
    pub accepted_by_ngo: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub assigned_volunteer: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Donation data for creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDonation {
    pub donor_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub food_category: FoodCategory,
    pub quantity: String,
    pub unit: Option<String>,
    pub expire_at: DateTime<Utc>,
    pub prepared_at: Option<DateTime<Utc>>,
    pub pickup_address: String,
    pub pickup_city: String,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub food_image_url: Option<String>,
    pub quality_notes: Option<String>,
    pub temperature_indicator: Option<String>,
}

// ============================================================================
// Donation Request Model
// ============================================================================

/// An NGO's request against an available donation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DonationRequest {
    pub id: Uuid,
    pub donation_id: Uuid,
    pub ngo_id: Uuid,
    pub distance_km: Option<f64>,
    pub request_message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Donation request data for creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonationRequest {
    pub donation_id: Uuid,
    pub ngo_id: Uuid,
    pub distance_km: Option<f64>,
    pub request_message: Option<String>,
}

// ============================================================================
// Delivery Tracking Model
// ============================================================================

/// A volunteer's delivery record tied to a donation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeliveryTracking {
    pub id: Uuid,
    pub donation_id: Uuid,
    pub ngo_id: Uuid,
    pub volunteer_id: Uuid,
    pub status: DeliveryStatus,
    pub pickup_time: Option<DateTime<Utc>>,
    pub delivery_time: Option<DateTime<Utc>>,
    pub donor_rating: Option<i16>,
    pub ngo_rating: Option<i16>,
    pub volunteer_rating: Option<i16>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Which party a delivery rating applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTarget {
    Donor,
    Ngo,
    Volunteer,
}

// ============================================================================
// Role-Specific Profile Models
// ============================================================================

/// NGO extension record created at role-selection time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NgoProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_name: String,
    pub registration_number: Option<String>,
    pub description: Option<String>,
    pub operating_hours: Option<String>,
    pub beneficiaries_count: Option<i32>,
    pub vehicle_capacity: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Volunteer extension record created at role-selection time
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VolunteerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
    pub availability_status: bool,
    pub rating: f64,
    pub total_deliveries: i32,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Analytics Model
// ============================================================================

/// Precomputed monthly aggregate per user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalyticsSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub month_year: String,
    pub total_donations: i32,
    pub completed_deliveries: i32,
    pub total_weight_kg: f64,
    pub people_fed_estimate: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_from_user() {
        let user = User {
            id: Uuid::new_v4(),
            email: "donor@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            full_name: "Test Donor".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response: UserResponse = user.clone().into();

        assert_eq!(response.id, user.id);
        assert_eq!(response.email, user.email);
        assert_eq!(response.full_name, user.full_name);
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "donor@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            full_name: "Test Donor".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$12$secret"));
    }

    #[test]
    fn test_create_donation_deserialization() {
        let json = r#"{
            "donor_id": "00000000-0000-0000-0000-000000000001",
            "title": "Leftover catering trays",
            "description": "Rice and curry from an office event",
            "food_category": "cooked_food",
            "quantity": "12",
            "unit": "trays",
            "expire_at": "2025-06-01T18:00:00Z",
            "prepared_at": "2025-06-01T10:00:00Z",
            "pickup_address": "12 Market Street",
            "pickup_city": "Pune",
            "pickup_latitude": 18.52,
            "pickup_longitude": 73.85,
            "food_image_url": null,
            "quality_notes": null,
            "temperature_indicator": "hot"
        }"#;

        let request: CreateDonation = serde_json::from_str(json).unwrap();

        assert_eq!(request.title, "Leftover catering trays");
        assert_eq!(request.food_category, crate::core::FoodCategory::CookedFood);
        assert_eq!(request.pickup_city, "Pune");
        assert_eq!(request.unit.as_deref(), Some("trays"));
    }

    #[test]
    fn test_update_profile_defaults_to_no_changes() {
        let update: UpdateProfile = serde_json::from_str("{}").unwrap();

        assert!(update.phone.is_none());
        assert!(update.city.is_none());
        assert!(update.latitude.is_none());
    }

    #[test]
    fn test_rating_target_serde() {
        assert_eq!(
            serde_json::to_string(&RatingTarget::Volunteer).unwrap(),
            r#""volunteer""#
        );
        let target: RatingTarget = serde_json::from_str(r#""ngo""#).unwrap();
        assert_eq!(target, RatingTarget::Ngo);
    }
}
