//! Profile and role API endpoints
//!
//! Provides REST API endpoints for onboarding and profile management:
//! - POST /api/roles - Pick a role (once per account)
//! - GET /api/roles/me - Current user's role and extension record
//! - GET /api/profile - Contact profile
//! - PUT /api/profile - Partial profile update
//! - GET /api/analytics/summary - Monthly impact summaries

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::UserRole;
use crate::core::auth::JwtService;
use crate::core::db::models::{
    AnalyticsSummary, NgoProfile, Profile, UpdateProfile, VolunteerProfile,
};
use crate::core::db::repositories::{
    AnalyticsRepository, AnalyticsRepositoryError, ProfileRepository, ProfileRepositoryError,
    RoleRepository, RoleRepositoryError,
};

/// Profile API state
#[derive(Clone)]
pub struct ProfileApiState {
    pub profile_repo: ProfileRepository,
    pub role_repo: RoleRepository,
    pub analytics_repo: AnalyticsRepository,
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

/// Profile API error types
#[derive(Debug, thiserror::Error)]
pub enum ProfileApiError {
    #[error("Profile not found")]
    ProfileNotFound,

    #[error("No role selected yet")]
    RoleNotFound,

    #[error("A role has already been selected for this account")]
    RoleAlreadyAssigned,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<RoleRepositoryError> for ProfileApiError {
    fn from(err: RoleRepositoryError) -> Self {
        match err {
            RoleRepositoryError::NotFound => ProfileApiError::RoleNotFound,
            RoleRepositoryError::RoleAlreadyAssigned => ProfileApiError::RoleAlreadyAssigned,
            RoleRepositoryError::MissingOrganizationName => {
                ProfileApiError::BadRequest(err.to_string())
            }
            RoleRepositoryError::DatabaseError(e) => ProfileApiError::InternalError(e.to_string()),
        }
    }
}

impl From<ProfileRepositoryError> for ProfileApiError {
    fn from(err: ProfileRepositoryError) -> Self {
        match err {
            ProfileRepositoryError::NotFound => ProfileApiError::ProfileNotFound,
            ProfileRepositoryError::DatabaseError(e) => {
                ProfileApiError::InternalError(e.to_string())
            }
        }
    }
}

impl From<AnalyticsRepositoryError> for ProfileApiError {
    fn from(err: AnalyticsRepositoryError) -> Self {
        match err {
            AnalyticsRepositoryError::DatabaseError(e) => {
                ProfileApiError::InternalError(e.to_string())
            }
        }
    }
}

impl IntoResponse for ProfileApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ProfileApiError::ProfileNotFound => (StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND"),
            ProfileApiError::RoleNotFound => (StatusCode::NOT_FOUND, "ROLE_NOT_FOUND"),
            ProfileApiError::RoleAlreadyAssigned => (StatusCode::CONFLICT, "ROLE_ALREADY_ASSIGNED"),
            ProfileApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ProfileApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            ProfileApiError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            ProfileApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ProfileApiError::InternalError(_) => {
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

/// Request for selecting a role
#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub role: UserRole,
    #[serde(default)]
    pub organization_name: Option<String>,
}

/// Response describing the user's role and its extension record
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngo_profile: Option<NgoProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_profile: Option<VolunteerProfile>,
}

/// Response for analytics listing
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub summaries: Vec<AnalyticsSummary>,
    pub count: usize,
}

// ============================================================================
// Router
// ============================================================================

/// Create the profile API router
pub fn profile_api_router(state: ProfileApiState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/api/roles", post(select_role_handler))
        .route("/api/roles/me", get(my_role_handler))
        .route("/api/profile", get(get_profile_handler))
        .route("/api/profile", put(update_profile_handler))
        .route("/api/analytics/summary", get(analytics_handler))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/roles
/// Select a role for the account; NGOs may provide an organization name
async fn select_role_handler(
    State(state): State<Arc<ProfileApiState>>,
    headers: HeaderMap,
    Json(request): Json<SelectRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), ProfileApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    if let Some(name) = &request.organization_name {
        if name.trim().is_empty() {
            return Err(ProfileApiError::BadRequest(
                "Organization name cannot be empty".to_string(),
            ));
        }
    }

    let record = state
        .role_repo
        .assign(user_id, request.role, request.organization_name.as_deref())
        .await?;

    tracing::info!("User {} selected role {}", user_id, record.role);

    let response = build_role_response(&state.role_repo, user_id, record.role).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/roles/me
/// Current user's role; 404 until one has been selected
async fn my_role_handler(
    State(state): State<Arc<ProfileApiState>>,
    headers: HeaderMap,
) -> Result<Json<RoleResponse>, ProfileApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let record = state
        .role_repo
        .find_by_user(user_id)
        .await?
        .ok_or(ProfileApiError::RoleNotFound)?;

    let response = build_role_response(&state.role_repo, user_id, record.role).await?;

    Ok(Json(response))
}

/// GET /api/profile
async fn get_profile_handler(
    State(state): State<Arc<ProfileApiState>>,
    headers: HeaderMap,
) -> Result<Json<Profile>, ProfileApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let profile = state
        .profile_repo
        .find_by_user(user_id)
        .await?
        .ok_or(ProfileApiError::ProfileNotFound)?;

    Ok(Json(profile))
}

/// PUT /api/profile
/// Partial update; omitted fields keep their stored value
async fn update_profile_handler(
    State(state): State<Arc<ProfileApiState>>,
    headers: HeaderMap,
    Json(updates): Json<UpdateProfile>,
) -> Result<Json<Profile>, ProfileApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let profile = state.profile_repo.update(user_id, &updates).await?;

    tracing::debug!("Profile updated for user {}", user_id);

    Ok(Json(profile))
}

/// GET /api/analytics/summary
async fn analytics_handler(
    State(state): State<Arc<ProfileApiState>>,
    headers: HeaderMap,
) -> Result<Json<AnalyticsResponse>, ProfileApiError> {
    let user_id = extract_user_id(&state.jwt_service, &headers)?;

    let summaries = state.analytics_repo.list_for_user(user_id).await?;
    let count = summaries.len();

    Ok(Json(AnalyticsResponse { summaries, count }))
}

/// Attach the role's extension record, if any
async fn build_role_response(
    role_repo: &RoleRepository,
    user_id: Uuid,
    role: UserRole,
) -> Result<RoleResponse, ProfileApiError> {
    let mut response = RoleResponse {
        role,
        ngo_profile: None,
        volunteer_profile: None,
    };

    match role {
        UserRole::Ngo => {
            response.ngo_profile = role_repo.ngo_profile(user_id).await?;
        }
        UserRole::Volunteer => {
            response.volunteer_profile = role_repo.volunteer_profile(user_id).await?;
        }
        UserRole::Donor => {}
    }

    Ok(response)
}

// ============================================================================
// Auth helpers
// ============================================================================

/// Extract the authenticated user ID from the Authorization header
fn extract_user_id(
    jwt_service: &JwtService,
    headers: &HeaderMap,
) -> Result<Uuid, ProfileApiError> {
    let token = extract_bearer_token(headers)?;

    let claims = jwt_service
        .validate_access_token(&token)
        .map_err(|e| match e {
            crate::core::auth::JwtError::Expired => ProfileApiError::TokenExpired,
            _ => ProfileApiError::InvalidToken,
        })?;

    claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| ProfileApiError::InvalidToken)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ProfileApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ProfileApiError::Unauthorized)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(ProfileApiError::InvalidToken);
    }

    let token = auth_header.trim_start_matches("Bearer ").to_string();

    if token.is_empty() {
        return Err(ProfileApiError::InvalidToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_role_request_deserialization() {
        let json = r#"{"role": "ngo", "organization_name": "Helping Hands"}"#;

        let request: SelectRoleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, UserRole::Ngo);
        assert_eq!(request.organization_name.as_deref(), Some("Helping Hands"));
    }

    #[test]
    fn test_select_role_request_without_organization() {
        let json = r#"{"role": "donor"}"#;

        let request: SelectRoleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, UserRole::Donor);
        assert!(request.organization_name.is_none());
    }

    #[test]
    fn test_role_response_omits_empty_extensions() {
        let response = RoleResponse {
            role: UserRole::Donor,
            ngo_profile: None,
            volunteer_profile: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("ngo_profile"));
        assert!(!json.contains("volunteer_profile"));
    }

    #[test]
    fn test_profile_api_error_from_role_error() {
        let err: ProfileApiError = RoleRepositoryError::RoleAlreadyAssigned.into();
        assert!(matches!(err, ProfileApiError::RoleAlreadyAssigned));

        let err: ProfileApiError = RoleRepositoryError::MissingOrganizationName.into();
        assert!(matches!(err, ProfileApiError::BadRequest(_)));
    }
}
