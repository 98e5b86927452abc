//! API client helpers for the frontend
//!
//! Thin wrappers around the browser fetch API that attach the JWT access
//! token and decode JSON responses, plus the view-side DTOs the dashboards
//! deserialize into.

use serde::{Deserialize, Serialize};

use crate::core::{DeliveryStatus, DonationStatus, FoodCategory, UserRole};

/// Error body returned by the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[allow(dead_code)]
    pub code: String,
}

// ============================================================================
// View DTOs
// ============================================================================

/// Donation as rendered in lists and cards
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DonationItem {
    pub id: String,
    pub donor_id: String,
    pub title: String,
    pub description: Option<String>,
    pub food_category: FoodCategory,
    pub quantity: String,
    pub unit: Option<String>,
    pub status: DonationStatus,
    pub pickup_address: String,
    pub pickup_city: String,
    pub expire_at: String,
    pub created_at: String,
    pub accepted_by_ngo: Option<String>,
    pub assigned_volunteer: Option<String>,
}

/// Donation list response
#[derive(Debug, Clone, Deserialize)]
pub struct DonationList {
    pub donations: Vec<DonationItem>,
    pub count: usize,
}

/// Delivery as rendered on the volunteer dashboard
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeliveryItem {
    pub id: String,
    pub donation_id: String,
    pub volunteer_id: String,
    pub status: DeliveryStatus,
    pub pickup_time: Option<String>,
    pub delivery_time: Option<String>,
    pub donor_rating: Option<i16>,
    pub ngo_rating: Option<i16>,
    pub volunteer_rating: Option<i16>,
}

/// Delivery list response
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryList {
    pub deliveries: Vec<DeliveryItem>,
    pub count: usize,
}

/// NGO request against a donation, as shown to the donor
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestItem {
    pub id: String,
    pub donation_id: String,
    pub ngo_id: String,
    pub distance_km: Option<f64>,
    pub request_message: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Request list response
#[derive(Debug, Clone, Deserialize)]
pub struct RequestList {
    pub requests: Vec<RequestItem>,
    pub count: usize,
}

/// Role response from GET /api/roles/me
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoleInfo {
    pub role: UserRole,
    #[serde(default)]
    pub ngo_profile: Option<NgoProfileInfo>,
    #[serde(default)]
    pub volunteer_profile: Option<VolunteerProfileInfo>,
}

/// NGO extension record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NgoProfileInfo {
    pub organization_name: String,
    pub verified: bool,
}

/// Volunteer extension record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VolunteerProfileInfo {
    pub rating: f64,
    pub total_deliveries: i32,
}

/// Body for POST /api/roles
#[derive(Debug, Serialize)]
pub struct SelectRoleBody {
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

/// Body for POST /api/donations/{id}/requests
#[derive(Debug, Serialize)]
pub struct FileRequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_message: Option<String>,
}

/// Body for POST /api/deliveries
#[derive(Debug, Serialize)]
pub struct ClaimBody {
    pub donation_id: String,
}

/// Body for POST /api/deliveries/{id}/rate
#[derive(Debug, Serialize)]
pub struct RateBody {
    pub target: &'static str,
    pub rating: i16,
}

/// Body for POST /api/donations
#[derive(Debug, Serialize)]
pub struct CreateDonationBody {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub food_category: FoodCategory,
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub expire_at: String,
    pub pickup_address: String,
    pub pickup_city: String,
}

// ============================================================================
// Fetch helpers
// ============================================================================

/// Perform a JSON request against the API
#[cfg(not(feature = "ssr"))]
async fn request<T: serde::de::DeserializeOwned>(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<String>,
) -> Result<T, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    let window = web_sys::window().ok_or("No window")?;

    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = body {
        opts.set_body(&body.into());
    }

    let req = Request::new_with_str_and_init(path, &opts).map_err(|e| format!("{:?}", e))?;

    req.headers()
        .set("Content-Type", "application/json")
        .map_err(|e| format!("{:?}", e))?;

    if let Some(token) = token {
        req.headers()
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(|e| format!("{:?}", e))?;
    }

    let resp_value = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(|e| format!("{:?}", e))?;

    let resp: Response = resp_value.dyn_into().map_err(|e| format!("{:?}", e))?;

    let json = JsFuture::from(resp.json().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("{:?}", e))?;

    if resp.ok() {
        serde_wasm_bindgen::from_value(json).map_err(|e| e.to_string())
    } else {
        let err: ApiErrorBody = serde_wasm_bindgen::from_value(json)
            .map_err(|_| format!("Request failed with status {}", resp.status()))?;
        Err(err.error)
    }
}

/// GET an authenticated JSON resource
#[cfg(not(feature = "ssr"))]
pub async fn api_get<T: serde::de::DeserializeOwned>(
    path: &str,
    token: &str,
) -> Result<T, String> {
    request("GET", path, Some(token), None).await
}

/// POST a JSON body to an authenticated endpoint
#[cfg(not(feature = "ssr"))]
pub async fn api_post<B: Serialize, T: serde::de::DeserializeOwned>(
    path: &str,
    token: &str,
    body: &B,
) -> Result<T, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    request("POST", path, Some(token), Some(body)).await
}

/// POST to an authenticated endpoint with no body
#[cfg(not(feature = "ssr"))]
pub async fn api_post_empty<T: serde::de::DeserializeOwned>(
    path: &str,
    token: &str,
) -> Result<T, String> {
    request("POST", path, Some(token), None).await
}

/// PUT a JSON body to an authenticated endpoint
#[cfg(not(feature = "ssr"))]
pub async fn api_put<B: Serialize, T: serde::de::DeserializeOwned>(
    path: &str,
    token: &str,
    body: &B,
) -> Result<T, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    request("PUT", path, Some(token), Some(body)).await
}

// SSR stubs - requests only happen in the browser

#[cfg(feature = "ssr")]
pub async fn api_get<T: serde::de::DeserializeOwned>(
    _path: &str,
    _token: &str,
) -> Result<T, String> {
    Err("Not available on server".to_string())
}

#[cfg(feature = "ssr")]
pub async fn api_post<B: Serialize, T: serde::de::DeserializeOwned>(
    _path: &str,
    _token: &str,
    _body: &B,
) -> Result<T, String> {
    Err("Not available on server".to_string())
}

#[cfg(feature = "ssr")]
pub async fn api_post_empty<T: serde::de::DeserializeOwned>(
    _path: &str,
    _token: &str,
) -> Result<T, String> {
    Err("Not available on server".to_string())
}

#[cfg(feature = "ssr")]
pub async fn api_put<B: Serialize, T: serde::de::DeserializeOwned>(
    _path: &str,
    _token: &str,
    _body: &B,
) -> Result<T, String> {
    Err("Not available on server".to_string())
}
