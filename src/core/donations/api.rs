//! Donation API endpoints
//!
//! Provides REST API endpoints for the donation lifecycle:
//! - POST /api/donations - Post a donation (donor)
//! - GET /api/donations?status=available - Browse open donations (ngo)
//! - GET /api/donations/mine - Donor's own donations
//! - GET /api/donations/accepted - NGO's accepted donations
//! - GET /api/donations/ready - Accepted donations awaiting a volunteer
//! - GET /api/donations/{id} - Get a single donation
//! - POST /api/donations/{id}/accept - Accept a donation (ngo, first wins)
//! - POST /api/donations/{id}/cancel - Cancel a donation (donor)
//! - POST /api/donations/{id}/requests - File a request (ngo)
//! - GET /api/donations/{id}/requests - View requests (donor)
//! - GET /api/donations/stats/donor - Donor dashboard counters
//! - GET /api/donations/stats/ngo - NGO dashboard counters

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::JwtService;
use crate::core::db::models::{CreateDonation, CreateDonationRequest, Donation, DonationRequest};
use crate::core::db::repositories::{
    DonationRepository, DonationRepositoryError, RoleRepository, RoleRepositoryError,
};
use crate::core::{DonorStats, FoodCategory, NgoStats, UserRole};

/// Donation API state
#[derive(Clone)]
pub struct DonationApiState {
    pub donation_repo: DonationRepository,
    pub role_repo: RoleRepository,
    pub jwt_service: JwtService,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Donation API error types
#[derive(Debug, thiserror::Error)]
pub enum DonationApiError {
    #[error("Donation not found")]
    NotFound,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("This action requires the {0} role")]
    WrongRole(UserRole),

    #[error("Donation does not belong to this user")]
    NotOwner,

    #[error("Donation has already been accepted")]
    AlreadyAccepted,

    #[error("Donation has expired")]
    Expired,

    #[error("Donation cannot change status from its current state")]
    InvalidTransition,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DonationRepositoryError> for DonationApiError {
    fn from(err: DonationRepositoryError) -> Self {
        match err {
            DonationRepositoryError::NotFound => DonationApiError::NotFound,
            DonationRepositoryError::NotOwner => DonationApiError::NotOwner,
            DonationRepositoryError::AlreadyAccepted => DonationApiError::AlreadyAccepted,
            DonationRepositoryError::Expired => DonationApiError::Expired,
            DonationRepositoryError::InvalidTransition { .. } => DonationApiError::InvalidTransition,
            DonationRepositoryError::DatabaseError(e) => {
                DonationApiError::InternalError(e.to_string())
            }
        }
    }
}

impl From<RoleRepositoryError> for DonationApiError {
    fn from(err: RoleRepositoryError) -> Self {
        DonationApiError::InternalError(err.to_string())
    }
}

impl IntoResponse for DonationApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DonationApiError::NotFound => (StatusCode::NOT_FOUND, "DONATION_NOT_FOUND"),
            DonationApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            DonationApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            DonationApiError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            DonationApiError::WrongRole(_) => (StatusCode::FORBIDDEN, "WRONG_ROLE"),
            DonationApiError::NotOwner => (StatusCode::FORBIDDEN, "NOT_OWNER"),
            DonationApiError::AlreadyAccepted => (StatusCode::CONFLICT, "ALREADY_ACCEPTED"),
            DonationApiError::Expired => (StatusCode::GONE, "DONATION_EXPIRED"),
            DonationApiError::InvalidTransition => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            DonationApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            DonationApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ApiError::new(self.to_string(), code);

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request for posting a donation
#[derive(Debug, Deserialize)]
pub struct CreateDonationApiRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub food_category: FoodCategory,
    pub quantity: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub expire_at: DateTime<Utc>,
    #[serde(default)]
    pub prepared_at: Option<DateTime<Utc>>,
    pub pickup_address: String,
    pub pickup_city: String,
    #[serde(default)]
    pub pickup_latitude: Option<f64>,
    #[serde(default)]
    pub pickup_longitude: Option<f64>,
    #[serde(default)]
    pub food_image_url: Option<String>,
    #[serde(default)]
    pub quality_notes: Option<String>,
    #[serde(default)]
    pub temperature_indicator: Option<String>,
}

/// Query parameters for listing donations
#[derive(Debug, Deserialize, Default)]
pub struct ListDonationsQuery {
    /// Only `available` is supported; other values are rejected
    pub status: Option<String>,
}

/// Request for filing a donation request
#[derive(Debug, Deserialize)]
pub struct FileRequestApiRequest {
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub request_message: Option<String>,
}

/// Response for a donation list
#[derive(Debug, Serialize)]
pub struct DonationListResponse {
    pub donations: Vec<Donation>,
    pub count: usize,
}

/// Response for a request list
#[derive(Debug, Serialize)]
pub struct RequestListResponse {
    pub requests: Vec<DonationRequest>,
    pub count: usize,
}

// ============================================================================
// Router
// ============================================================================

/// Create the donation API router
pub fn donation_api_router(state: DonationApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/donations", post(create_donation_handler))
        .route("/api/donations", get(list_donations_handler))
        .route("/api/donations/mine", get(list_mine_handler))
        .route("/api/donations/accepted", get(list_accepted_handler))
        .route("/api/donations/ready", get(list_ready_handler))
        .route("/api/donations/stats/donor", get(donor_stats_handler))
        .route("/api/donations/stats/ngo", get(ngo_stats_handler))
        .route("/api/donations/{id}", get(get_donation_handler))
        .route("/api/donations/{id}/accept", post(accept_handler))
        .route("/api/donations/{id}/cancel", post(cancel_handler))
        .route("/api/donations/{id}/requests", post(file_request_handler))
        .route("/api/donations/{id}/requests", get(list_requests_handler))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/donations
/// Post a new donation (donor only)
async fn create_donation_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
    Json(request): Json<CreateDonationApiRequest>,
) -> Result<(StatusCode, Json<Donation>), DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;
    require_role(&state.role_repo, user_id, UserRole::Donor).await?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(DonationApiError::BadRequest(
            "Donation title cannot be empty".to_string(),
        ));
    }
    if request.expire_at <= Utc::now() {
        return Err(DonationApiError::BadRequest(
            "Expiry time must be in the future".to_string(),
        ));
    }
    if request.quantity.trim().is_empty() {
        return Err(DonationApiError::BadRequest(
            "Quantity cannot be empty".to_string(),
        ));
    }

    tracing::info!("Creating donation '{}' for donor {}", title, user_id);

    let dto = CreateDonation {
        donor_id: user_id,
        title: title.to_string(),
        description: request.description,
        food_category: request.food_category,
        quantity: request.quantity,
        unit: request.unit,
        expire_at: request.expire_at,
        prepared_at: request.prepared_at,
        pickup_address: request.pickup_address,
        pickup_city: request.pickup_city,
        pickup_latitude: request.pickup_latitude,
        pickup_longitude: request.pickup_longitude,
        food_image_url: request.food_image_url,
        quality_notes: request.quality_notes,
        temperature_indicator: request.temperature_indicator,
    };

    let donation = state.donation_repo.create(&dto).await?;

    tracing::info!("Donation created: {}", donation.id);

    Ok((StatusCode::CREATED, Json(donation)))
}

/// GET /api/donations?status=available
/// Browse donations open for acceptance
async fn list_donations_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
    Query(query): Query<ListDonationsQuery>,
) -> Result<Json<DonationListResponse>, DonationApiError> {
    extract_user_id(&state.jwt_service, &headers)?;

    match query.status.as_deref() {
        Some("available") | None => {}
        Some(other) => {
            return Err(DonationApiError::BadRequest(format!(
                "Unsupported status filter: {other}"
            )));
        }
    }

    let donations = state.donation_repo.list_available().await?;
    let count = donations.len();

    Ok(Json(DonationListResponse { donations, count }))
}

/// GET /api/donations/mine
/// Donor's own donations, newest first
async fn list_mine_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
) -> Result<Json<DonationListResponse>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let donations = state.donation_repo.list_by_donor(user_id).await?;
    let count = donations.len();

    Ok(Json(DonationListResponse { donations, count }))
}

/// GET /api/donations/accepted
/// Donations this NGO has accepted
async fn list_accepted_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
) -> Result<Json<DonationListResponse>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let donations = state.donation_repo.list_accepted_by_ngo(user_id).await?;
    let count = donations.len();

    Ok(Json(DonationListResponse { donations, count }))
}

/// GET /api/donations/ready
/// Accepted donations awaiting a volunteer
async fn list_ready_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
) -> Result<Json<DonationListResponse>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;
    require_role(&state.role_repo, user_id, UserRole::Volunteer).await?;

    let donations = state.donation_repo.list_ready_for_pickup().await?;
    let count = donations.len();

    Ok(Json(DonationListResponse { donations, count }))
}

/// GET /api/donations/stats/donor
async fn donor_stats_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
) -> Result<Json<DonorStats>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let stats = state.donation_repo.donor_stats(user_id).await?;

    Ok(Json(stats))
}

/// GET /api/donations/stats/ngo
async fn ngo_stats_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
) -> Result<Json<NgoStats>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let stats = state.donation_repo.ngo_stats(user_id).await?;

    Ok(Json(stats))
}

/// GET /api/donations/{id}
async fn get_donation_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Donation>, DonationApiError> {
    extract_user_id(&state.jwt_service, &headers)?;

    let donation = state
        .donation_repo
        .find_by_id(id)
        .await?
        .ok_or(DonationApiError::NotFound)?;

    Ok(Json(donation))
}

/// POST /api/donations/{id}/accept
/// NGO accepts a donation; first one wins
async fn accept_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Donation>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;
    require_role(&state.role_repo, user_id, UserRole::Ngo).await?;

    let donation = state.donation_repo.accept(id, user_id).await?;

    tracing::info!("Donation {} accepted by NGO {}", id, user_id);

    Ok(Json(donation))
}

/// POST /api/donations/{id}/cancel
/// Donor cancels their own donation before pickup
async fn cancel_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Donation>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let donation = state.donation_repo.cancel(id, user_id).await?;

    tracing::info!("Donation {} cancelled by donor {}", id, user_id);

    Ok(Json(donation))
}

/// POST /api/donations/{id}/requests
/// NGO files a request with distance and message
async fn file_request_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<FileRequestApiRequest>,
) -> Result<(StatusCode, Json<DonationRequest>), DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;
    require_role(&state.role_repo, user_id, UserRole::Ngo).await?;

    let dto = CreateDonationRequest {
        donation_id: id,
        ngo_id: user_id,
        distance_km: request.distance_km,
        request_message: request.request_message,
    };

    let created = state.donation_repo.create_request(&dto).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/donations/{id}/requests
/// Donor views requests filed against their donation
async fn list_requests_handler(
    State(state): State<Arc<DonationApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<RequestListResponse>, DonationApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let donation = state
        .donation_repo
        .find_by_id(id)
        .await?
        .ok_or(DonationApiError::NotFound)?;

    if donation.donor_id != user_id {
        return Err(DonationApiError::NotOwner);
    }

    let requests = state.donation_repo.list_requests(id).await?;
    let count = requests.len();

    Ok(Json(RequestListResponse { requests, count }))
}

// ============================================================================
// Auth helpers
// ============================================================================

/// Check that the user holds the required role
async fn require_role(
    role_repo: &RoleRepository,
    user_id: Uuid,
    required: UserRole,
) -> Result<(), DonationApiError> {
    let record = role_repo
        .find_by_user(user_id)
        .await?
        .ok_or(DonationApiError::WrongRole(required))?;

    if record.role != required {
        return Err(DonationApiError::WrongRole(required));
    }

    Ok(())
}

/// Extract the authenticated user ID from the Authorization header
fn extract_user_id(
    jwt_service: &JwtService,
    headers: &HeaderMap,
) -> Result<Uuid, DonationApiError> {
    let token = extract_bearer_token(headers)?;

    let claims = jwt_service
        .validate_access_token(&token)
        .map_err(|e| match e {
            crate::core::auth::JwtError::Expired => DonationApiError::TokenExpired,
            _ => DonationApiError::InvalidToken,
        })?;

    claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| DonationApiError::InvalidToken)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, DonationApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(DonationApiError::Unauthorized)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(DonationApiError::InvalidToken);
    }

    let token = auth_header.trim_start_matches("Bearer ").to_string();

    if token.is_empty() {
        return Err(DonationApiError::InvalidToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token_valid() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer donation_token"),
        );

        let token = extract_bearer_token(&headers).unwrap();
        assert_eq!(token, "donation_token");
    }

    #[test]
    fn test_extract_bearer_token_missing_header() {
        let headers = HeaderMap::new();

        let result = extract_bearer_token(&headers);
        assert!(matches!(result, Err(DonationApiError::Unauthorized)));
    }

    #[test]
    fn test_donation_api_error_from_repo_error() {
        let err: DonationApiError = DonationRepositoryError::NotFound.into();
        assert!(matches!(err, DonationApiError::NotFound));

        let err: DonationApiError = DonationRepositoryError::AlreadyAccepted.into();
        assert!(matches!(err, DonationApiError::AlreadyAccepted));

        let err: DonationApiError = DonationRepositoryError::InvalidTransition {
            from: crate::core::DonationStatus::Delivered,
        }
        .into();
        assert!(matches!(err, DonationApiError::InvalidTransition));
    }

    #[test]
    fn test_wrong_role_error_display() {
        let err = DonationApiError::WrongRole(UserRole::Donor);
        assert_eq!(format!("{}", err), "This action requires the donor role");
    }

    #[test]
    fn test_create_donation_request_deserialization() {
        let json = r#"{
            "title": "Bread loaves",
            "food_category": "bakery",
            "quantity": "20",
            "expire_at": "2025-06-02T08:00:00Z",
            "pickup_address": "5 Baker Street",
            "pickup_city": "Delhi"
        }"#;

        let request: CreateDonationApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.title, "Bread loaves");
        assert_eq!(request.food_category, FoodCategory::Bakery);
        assert!(request.description.is_none());
        assert!(request.unit.is_none());
    }

    #[test]
    fn test_list_donations_query_defaults() {
        let query: ListDonationsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.status.is_none());
    }
}
