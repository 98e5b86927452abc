//! Delivery API endpoints
//!
//! Provides REST API endpoints for delivery tracking:
//! - POST /api/deliveries - Claim an accepted donation (volunteer)
//! - GET /api/deliveries/mine - Volunteer's deliveries
//! - GET /api/deliveries/stats - Volunteer dashboard counters
//! - POST /api/deliveries/{id}/pickup - Stamp pickup time
//! - POST /api/deliveries/{id}/deliver - Stamp delivery time
//! - POST /api/deliveries/{id}/rate - Record a rating

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::JwtService;
use crate::core::db::models::{DeliveryTracking, RatingTarget};
use crate::core::db::repositories::{
    DeliveryRepository, DeliveryRepositoryError, RoleRepository, RoleRepositoryError,
};
use crate::core::{UserRole, VolunteerStats};

/// Delivery API state
#[derive(Clone)]
pub struct DeliveryApiState {
    pub delivery_repo: DeliveryRepository,
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

/// Delivery API error types
#[derive(Debug, thiserror::Error)]
pub enum DeliveryApiError {
    #[error("Delivery not found")]
    NotFound,

    #[error("Donation not found")]
    DonationNotFound,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("This action requires the {0} role")]
    WrongRole(UserRole),

    #[error("Donation is not ready for pickup")]
    DonationNotReady,

    #[error("Donation already has an assigned volunteer")]
    AlreadyClaimed,

    #[error("Delivery is not assigned to this volunteer")]
    NotAssignedVolunteer,

    #[error("Delivery cannot change status from its current state")]
    InvalidTransition,

    #[error("Rating must be between 1 and 5")]
    InvalidRating,

    #[error("Delivery has not been completed yet")]
    NotDelivered,

    #[error("Only a party to the delivery may rate it")]
    NotRatingParty,

    #[error("This party has already been rated")]
    AlreadyRated,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DeliveryRepositoryError> for DeliveryApiError {
    fn from(err: DeliveryRepositoryError) -> Self {
        match err {
            DeliveryRepositoryError::NotFound => DeliveryApiError::NotFound,
            DeliveryRepositoryError::DonationNotFound => DeliveryApiError::DonationNotFound,
            DeliveryRepositoryError::DonationNotReady => DeliveryApiError::DonationNotReady,
            DeliveryRepositoryError::AlreadyClaimed => DeliveryApiError::AlreadyClaimed,
            DeliveryRepositoryError::NotAssignedVolunteer => {
                DeliveryApiError::NotAssignedVolunteer
            }
            DeliveryRepositoryError::InvalidTransition { .. } => DeliveryApiError::InvalidTransition,
            DeliveryRepositoryError::InvalidRating(_) => DeliveryApiError::InvalidRating,
            DeliveryRepositoryError::NotDelivered => DeliveryApiError::NotDelivered,
            DeliveryRepositoryError::NotRatingParty => DeliveryApiError::NotRatingParty,
            DeliveryRepositoryError::AlreadyRated => DeliveryApiError::AlreadyRated,
            DeliveryRepositoryError::DatabaseError(e) => {
                DeliveryApiError::InternalError(e.to_string())
            }
        }
    }
}

impl From<RoleRepositoryError> for DeliveryApiError {
    fn from(err: RoleRepositoryError) -> Self {
        DeliveryApiError::InternalError(err.to_string())
    }
}

impl IntoResponse for DeliveryApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            DeliveryApiError::NotFound => (StatusCode::NOT_FOUND, "DELIVERY_NOT_FOUND"),
            DeliveryApiError::DonationNotFound => (StatusCode::NOT_FOUND, "DONATION_NOT_FOUND"),
            DeliveryApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            DeliveryApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            DeliveryApiError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            DeliveryApiError::WrongRole(_) => (StatusCode::FORBIDDEN, "WRONG_ROLE"),
            DeliveryApiError::DonationNotReady => (StatusCode::CONFLICT, "DONATION_NOT_READY"),
            DeliveryApiError::AlreadyClaimed => (StatusCode::CONFLICT, "ALREADY_CLAIMED"),
            DeliveryApiError::NotAssignedVolunteer => (StatusCode::FORBIDDEN, "NOT_ASSIGNED"),
            DeliveryApiError::InvalidTransition => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            DeliveryApiError::InvalidRating => (StatusCode::BAD_REQUEST, "INVALID_RATING"),
            DeliveryApiError::NotDelivered => (StatusCode::CONFLICT, "NOT_DELIVERED"),
            DeliveryApiError::NotRatingParty => (StatusCode::FORBIDDEN, "NOT_DELIVERY_PARTY"),
            DeliveryApiError::AlreadyRated => (StatusCode::CONFLICT, "ALREADY_RATED"),
            DeliveryApiError::InternalError(_) => {
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

/// Request for claiming a donation
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub donation_id: Uuid,
}

/// Request for rating a delivery party
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub target: RatingTarget,
    pub rating: i16,
}

/// Response for a delivery list
#[derive(Debug, Serialize)]
pub struct DeliveryListResponse {
    pub deliveries: Vec<DeliveryTracking>,
    pub count: usize,
}

// ============================================================================
// Router
// ============================================================================

/// Create the delivery API router
pub fn delivery_api_router(state: DeliveryApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/deliveries", post(claim_handler))
        .route("/api/deliveries/mine", get(list_mine_handler))
        .route("/api/deliveries/stats", get(stats_handler))
        .route("/api/deliveries/{id}/pickup", post(pickup_handler))
        .route("/api/deliveries/{id}/deliver", post(deliver_handler))
        .route("/api/deliveries/{id}/rate", post(rate_handler))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/deliveries
/// Volunteer claims an accepted donation
async fn claim_handler(
    State(state): State<Arc<DeliveryApiState>>,
    headers: HeaderMap,
    Json(request): Json<ClaimRequest>,
) -> Result<(StatusCode, Json<DeliveryTracking>), DeliveryApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;
    require_role(&state.role_repo, user_id, UserRole::Volunteer).await?;

    let delivery = state
        .delivery_repo
        .claim(request.donation_id, user_id)
        .await?;

    tracing::info!(
        "Donation {} claimed by volunteer {}",
        request.donation_id,
        user_id
    );

    Ok((StatusCode::CREATED, Json(delivery)))
}

/// GET /api/deliveries/mine
/// Volunteer's deliveries, newest first
async fn list_mine_handler(
    State(state): State<Arc<DeliveryApiState>>,
    headers: HeaderMap,
) -> Result<Json<DeliveryListResponse>, DeliveryApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let deliveries = state.delivery_repo.list_by_volunteer(user_id).await?;
    let count = deliveries.len();

    Ok(Json(DeliveryListResponse { deliveries, count }))
}

/// GET /api/deliveries/stats
async fn stats_handler(
    State(state): State<Arc<DeliveryApiState>>,
    headers: HeaderMap,
) -> Result<Json<VolunteerStats>, DeliveryApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let stats = state.delivery_repo.volunteer_stats(user_id).await?;

    Ok(Json(stats))
}

/// POST /api/deliveries/{id}/pickup
/// Stamp pickup time; donation advances to picked_up
async fn pickup_handler(
    State(state): State<Arc<DeliveryApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryTracking>, DeliveryApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let delivery = state.delivery_repo.mark_picked_up(id, user_id).await?;

    tracing::info!("Delivery {} picked up by volunteer {}", id, user_id);

    Ok(Json(delivery))
}

/// POST /api/deliveries/{id}/deliver
/// Stamp delivery time; donation advances to delivered
async fn deliver_handler(
    State(state): State<Arc<DeliveryApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryTracking>, DeliveryApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let delivery = state.delivery_repo.mark_delivered(id, user_id).await?;

    tracing::info!("Delivery {} completed by volunteer {}", id, user_id);

    Ok(Json(delivery))
}

/// POST /api/deliveries/{id}/rate
/// Record a 1-5 rating for a party on the delivery; the repository
/// verifies the caller is a party to it
async fn rate_handler(
    State(state): State<Arc<DeliveryApiState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<RateRequest>,
) -> Result<Json<DeliveryTracking>, DeliveryApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let delivery = state
        .delivery_repo
        .rate(id, user_id, request.target, request.rating)
        .await?;

    tracing::info!(
        "Delivery {} rated ({:?}) by user {}",
        id,
        request.target,
        user_id
    );

    Ok(Json(delivery))
}

// ============================================================================
// Auth helpers
// ============================================================================

/// Check that the user holds the required role
async fn require_role(
    role_repo: &RoleRepository,
    user_id: Uuid,
    required: UserRole,
) -> Result<(), DeliveryApiError> {
    let record = role_repo
        .find_by_user(user_id)
        .await?
        .ok_or(DeliveryApiError::WrongRole(required))?;

    if record.role != required {
        return Err(DeliveryApiError::WrongRole(required));
    }

    Ok(())
}

/// Extract the authenticated user ID from the Authorization header
fn extract_user_id(
    jwt_service: &JwtService,
    headers: &HeaderMap,
) -> Result<Uuid, DeliveryApiError> {
    let token = extract_bearer_token(headers)?;

    let claims = jwt_service
        .validate_access_token(&token)
        .map_err(|e| match e {
            crate::core::auth::JwtError::Expired => DeliveryApiError::TokenExpired,
            _ => DeliveryApiError::InvalidToken,
        })?;

    claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| DeliveryApiError::InvalidToken)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, DeliveryApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(DeliveryApiError::Unauthorized)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(DeliveryApiError::InvalidToken);
    }

    let token = auth_header.trim_start_matches("Bearer ").to_string();

    if token.is_empty() {
        return Err(DeliveryApiError::InvalidToken);
    }

    Ok(token)
}
