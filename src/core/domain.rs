//! Shared domain types for the donation lifecycle
//!
//! These types are used on both the server (database enums, API payloads)
//! and the client (dashboard rendering, stat counters).

use serde::{Deserialize, Serialize};

// ============================================================================
// User Role
// ============================================================================

/// The role a user picks once during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ssr", derive(sqlx::Type))]
#[cfg_attr(feature = "ssr", sqlx(type_name = "user_role", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Donor,
    Ngo,
    Volunteer,
}

impl UserRole {
    /// Dashboard route for this role
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            UserRole::Donor => "/dashboard/donor",
            UserRole::Ngo => "/dashboard/ngo",
            UserRole::Volunteer => "/dashboard/volunteer",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Donor => "donor",
            UserRole::Ngo => "ngo",
            UserRole::Volunteer => "volunteer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(UserRole::Donor),
            "ngo" => Ok(UserRole::Ngo),
            "volunteer" => Ok(UserRole::Volunteer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// ============================================================================
// Donation Status
// ============================================================================

/// Lifecycle stage of a donation
///
/// The status only advances forward: available -> accepted -> picked_up ->
/// delivered. Cancellation is allowed while the donation is still
/// available or accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ssr", derive(sqlx::Type))]
#[cfg_attr(
    feature = "ssr",
    sqlx(type_name = "donation_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Available,
    Accepted,
    PickedUp,
    Delivered,
    Cancelled,
}

impl DonationStatus {
    /// Whether a transition from `self` to `next` is allowed
    pub fn can_transition_to(&self, next: DonationStatus) -> bool {
        use DonationStatus::*;
        matches!(
            (self, next),
            (Available, Accepted)
                | (Accepted, PickedUp)
                | (PickedUp, Delivered)
                | (Available, Cancelled)
                | (Accepted, Cancelled)
        )
    }

    /// Delivered and cancelled donations never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, DonationStatus::Delivered | DonationStatus::Cancelled)
    }

    /// A donation counts as active while it awaits pickup
    pub fn is_active(&self) -> bool {
        matches!(self, DonationStatus::Available | DonationStatus::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Available => "available",
            DonationStatus::Accepted => "accepted",
            DonationStatus::PickedUp => "picked_up",
            DonationStatus::Delivered => "delivered",
            DonationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(DonationStatus::Available),
            "accepted" => Ok(DonationStatus::Accepted),
            "picked_up" => Ok(DonationStatus::PickedUp),
            "delivered" => Ok(DonationStatus::Delivered),
            "cancelled" => Ok(DonationStatus::Cancelled),
            _ => Err(format!("Invalid donation status: {}", s)),
        }
    }
}

// ============================================================================
// Delivery Status
// ============================================================================

/// Stage of a volunteer's delivery task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ssr", derive(sqlx::Type))]
#[cfg_attr(
    feature = "ssr",
    sqlx(type_name = "delivery_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Assigned,
    PickedUp,
    Delivered,
}

impl DeliveryStatus {
    /// A delivery is pending until the food reaches the NGO
    pub fn is_pending(&self) -> bool {
        matches!(self, DeliveryStatus::Assigned | DeliveryStatus::PickedUp)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::PickedUp => "picked_up",
            DeliveryStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Food Category
// ============================================================================

/// Category of donated food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ssr", derive(sqlx::Type))]
#[cfg_attr(
    feature = "ssr",
    sqlx(type_name = "food_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    CookedFood,
    RawFood,
    PackagedFood,
    Beverages,
    Bakery,
    Dairy,
    FruitsVegetables,
}

impl FoodCategory {
    /// All categories, in display order
    pub const ALL: [FoodCategory; 7] = [
        FoodCategory::CookedFood,
        FoodCategory::RawFood,
        FoodCategory::PackagedFood,
        FoodCategory::Beverages,
        FoodCategory::Bakery,
        FoodCategory::Dairy,
        FoodCategory::FruitsVegetables,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::CookedFood => "cooked_food",
            FoodCategory::RawFood => "raw_food",
            FoodCategory::PackagedFood => "packaged_food",
            FoodCategory::Beverages => "beverages",
            FoodCategory::Bakery => "bakery",
            FoodCategory::Dairy => "dairy",
            FoodCategory::FruitsVegetables => "fruits_vegetables",
        }
    }

    /// Human-readable label for pickers and badges
    pub fn display_name(&self) -> &'static str {
        match self {
            FoodCategory::CookedFood => "Cooked Food",
            FoodCategory::RawFood => "Raw Food",
            FoodCategory::PackagedFood => "Packaged Food",
            FoodCategory::Beverages => "Beverages",
            FoodCategory::Bakery => "Bakery",
            FoodCategory::Dairy => "Dairy",
            FoodCategory::FruitsVegetables => "Fruits & Vegetables",
        }
    }
}

impl std::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FoodCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cooked_food" => Ok(FoodCategory::CookedFood),
            "raw_food" => Ok(FoodCategory::RawFood),
            "packaged_food" => Ok(FoodCategory::PackagedFood),
            "beverages" => Ok(FoodCategory::Beverages),
            "bakery" => Ok(FoodCategory::Bakery),
            "dairy" => Ok(FoodCategory::Dairy),
            "fruits_vegetables" => Ok(FoodCategory::FruitsVegetables),
            _ => Err(format!("Invalid food category: {}", s)),
        }
    }
}

// ============================================================================
// Dashboard Stats
// ============================================================================

/// Donor dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DonorStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl DonorStats {
    /// Counts over the donor's donations: total, active (available or
    /// accepted), completed (delivered)
    pub fn from_statuses(statuses: &[DonationStatus]) -> Self {
        Self {
            total: statuses.len(),
            active: statuses.iter().filter(|s| s.is_active()).count(),
            completed: statuses
                .iter()
                .filter(|s| **s == DonationStatus::Delivered)
                .count(),
        }
    }
}

/// NGO dashboard counters over donations accepted by this NGO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NgoStats {
    pub accepted: usize,
    pub in_transit: usize,
    pub delivered: usize,
}

impl NgoStats {
    pub fn from_statuses(statuses: &[DonationStatus]) -> Self {
        Self {
            accepted: statuses
                .iter()
                .filter(|s| **s == DonationStatus::Accepted)
                .count(),
            in_transit: statuses
                .iter()
                .filter(|s| **s == DonationStatus::PickedUp)
                .count(),
            delivered: statuses
                .iter()
                .filter(|s| **s == DonationStatus::Delivered)
                .count(),
        }
    }
}

/// Volunteer dashboard counters over the volunteer's delivery tasks
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VolunteerStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub rating: f64,
}

impl VolunteerStats {
    pub fn from_deliveries(statuses: &[DeliveryStatus], rating: f64) -> Self {
        Self {
            total: statuses.len(),
            pending: statuses.iter().filter(|s| s.is_pending()).count(),
            completed: statuses
                .iter()
                .filter(|s| **s == DeliveryStatus::Delivered)
                .count(),
            rating,
        }
    }
}

// ============================================================================
// Toast Notification Types
// ============================================================================

/// Notification severity for toast display
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum NotificationType {
    Success,
    Error,
    Warning,
    Info,
}

/// Toast notification shown after user actions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub auto_dismiss_ms: Option<u32>,
}

impl AppNotification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            notification_type: NotificationType::Success,
            title: title.into(),
            message: message.into(),
            auto_dismiss_ms: Some(3000),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            notification_type: NotificationType::Error,
            title: title.into(),
            message: message.into(),
            auto_dismiss_ms: None, // Errors should be manually dismissed
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            notification_type: NotificationType::Warning,
            title: title.into(),
            message: message.into(),
            auto_dismiss_ms: Some(5000),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            notification_type: NotificationType::Info,
            title: title.into(),
            message: message.into(),
            auto_dismiss_ms: Some(3000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // ========================================================================
    // Role Tests
    // ========================================================================

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Donor, UserRole::Ngo, UserRole::Volunteer] {
            let parsed = UserRole::from_str(role.as_str()).unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_invalid() {
        assert!(UserRole::from_str("admin").is_err());
        assert!(UserRole::from_str("").is_err());
        assert!(UserRole::from_str("Donor").is_err()); // case sensitive
    }

    #[test]
    fn test_role_dashboard_path() {
        assert_eq!(UserRole::Donor.dashboard_path(), "/dashboard/donor");
        assert_eq!(UserRole::Ngo.dashboard_path(), "/dashboard/ngo");
        assert_eq!(UserRole::Volunteer.dashboard_path(), "/dashboard/volunteer");
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&UserRole::Ngo).unwrap(), r#""ngo""#);
        let role: UserRole = serde_json::from_str(r#""volunteer""#).unwrap();
        assert_eq!(role, UserRole::Volunteer);
    }

    // ========================================================================
    // Donation Status Tests
    // ========================================================================

    #[test]
    fn test_status_forward_transitions() {
        use DonationStatus::*;
        assert!(Available.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(PickedUp));
        assert!(PickedUp.can_transition_to(Delivered));
    }

    #[test]
    fn test_status_cancellation() {
        use DonationStatus::*;
        assert!(Available.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Cancelled));
        // Once in transit the donation can no longer be cancelled
        assert!(!PickedUp.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn test_status_never_moves_backward() {
        use DonationStatus::*;
        assert!(!Accepted.can_transition_to(Available));
        assert!(!PickedUp.can_transition_to(Accepted));
        assert!(!Delivered.can_transition_to(PickedUp));
        assert!(!Cancelled.can_transition_to(Available));
    }

    #[test]
    fn test_status_no_skipping() {
        use DonationStatus::*;
        assert!(!Available.can_transition_to(PickedUp));
        assert!(!Available.can_transition_to(Delivered));
        assert!(!Accepted.can_transition_to(Delivered));
    }

    #[test]
    fn test_status_terminal() {
        assert!(DonationStatus::Delivered.is_terminal());
        assert!(DonationStatus::Cancelled.is_terminal());
        assert!(!DonationStatus::Available.is_terminal());
        assert!(!DonationStatus::Accepted.is_terminal());
        assert!(!DonationStatus::PickedUp.is_terminal());
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&DonationStatus::PickedUp).unwrap(),
            r#""picked_up""#
        );
        let status: DonationStatus = serde_json::from_str(r#""available""#).unwrap();
        assert_eq!(status, DonationStatus::Available);
    }

    #[test]
    fn test_status_round_trip() {
        use DonationStatus::*;
        for status in [Available, Accepted, PickedUp, Delivered, Cancelled] {
            assert_eq!(DonationStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    // ========================================================================
    // Food Category Tests
    // ========================================================================

    #[test]
    fn test_category_round_trip() {
        for category in FoodCategory::ALL {
            assert_eq!(
                FoodCategory::from_str(category.as_str()).unwrap(),
                category
            );
        }
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(FoodCategory::CookedFood.display_name(), "Cooked Food");
        assert_eq!(
            FoodCategory::FruitsVegetables.display_name(),
            "Fruits & Vegetables"
        );
    }

    #[test]
    fn test_category_invalid() {
        assert!(FoodCategory::from_str("electronics").is_err());
    }

    // ========================================================================
    // Stats Tests
    // ========================================================================

    #[test]
    fn test_donor_stats_counts_equal_filtered_lengths() {
        use DonationStatus::*;
        let statuses = [Available, Accepted, PickedUp, Delivered, Delivered, Cancelled];

        let stats = DonorStats::from_statuses(&statuses);

        assert_eq!(stats.total, statuses.len());
        assert_eq!(
            stats.active,
            statuses.iter().filter(|s| s.is_active()).count()
        );
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 2);
    }

    #[test]
    fn test_donor_stats_empty() {
        let stats = DonorStats::from_statuses(&[]);
        assert_eq!(stats, DonorStats::default());
    }

    #[test]
    fn test_ngo_stats() {
        use DonationStatus::*;
        let statuses = [Accepted, Accepted, PickedUp, Delivered];

        let stats = NgoStats::from_statuses(&statuses);

        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.in_transit, 1);
        assert_eq!(stats.delivered, 1);
    }

    #[test]
    fn test_volunteer_stats() {
        use DeliveryStatus::*;
        let statuses = [Assigned, PickedUp, Delivered, Delivered];

        let stats = VolunteerStats::from_deliveries(&statuses, 4.5);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completed, 2);
        assert!((stats.rating - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delivery_status_pending() {
        assert!(DeliveryStatus::Assigned.is_pending());
        assert!(DeliveryStatus::PickedUp.is_pending());
        assert!(!DeliveryStatus::Delivered.is_pending());
    }

    // ========================================================================
    // Notification Tests
    // ========================================================================

    #[test]
    fn test_notification_auto_dismiss() {
        assert_eq!(
            AppNotification::success("t", "m").auto_dismiss_ms,
            Some(3000)
        );
        assert_eq!(AppNotification::error("t", "m").auto_dismiss_ms, None);
        assert_eq!(
            AppNotification::warning("t", "m").auto_dismiss_ms,
            Some(5000)
        );
    }
}
