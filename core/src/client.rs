//! Request dispatcher for the marketplace API.
//!
//! # Design
//! `MarketplaceClient` holds the base URL and a shared handle to the
//! credential cache. Every request it builds passes through one hook that
//! reads the cached token and either attaches `authorization: Bearer <token>`
//! or leaves the header off entirely. Operations are split into `build_*`
//! methods that produce an `HttpRequest` and `parse_*` methods that consume an
//! `HttpResponse`; the caller executes the round-trip in between.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::envelope::{envelope_message, unwrap_envelope};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::{OrderItems, Orders, Products, ResourceClient, Reviews, Stores, Users};
use crate::session::{is_well_formed, SessionStore};
use crate::types::{AuthResponse, DashboardStats, LoginRequest, RegisterRequest, UserProfile};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    base_url: String,
    session: Arc<SessionStore>,
    require_jwt_shape: bool,
}

impl MarketplaceClient {
    pub fn new(base_url: &str, session: Arc<SessionStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            require_jwt_shape: true,
        }
    }

    pub fn from_config(config: &ClientConfig, session: Arc<SessionStore>) -> Self {
        Self::new(&config.resolved_base_url(), session)
            .with_jwt_shape_check(config.require_jwt_shape)
    }

    /// When disabled, any non-empty cached token is attached.
    pub fn with_jwt_shape_check(mut self, enabled: bool) -> Self {
        self.require_jwt_shape = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Build a request for `path` (relative to the base URL), attaching the
    /// cached token when it qualifies.
    pub fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push((JSON_CONTENT_TYPE.0.to_string(), JSON_CONTENT_TYPE.1.to_string()));
        }
        let authorization = self.authorization();
        let authorized = authorization.is_some();
        if let Some(value) = authorization {
            headers.push(("authorization".to_string(), value));
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, authorized, "API request");
        HttpRequest {
            method,
            path: url,
            headers,
            body,
        }
    }

    pub fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(method, path, Some(body)))
    }

    fn authorization(&self) -> Option<String> {
        let token = self.session.token()?;
        if token.trim().is_empty() {
            return None;
        }
        if self.require_jwt_shape && !is_well_formed(&token) {
            warn!("cached token is not a well-formed JWT; sending request without authorization");
            return None;
        }
        Some(format!("Bearer {token}"))
    }

    pub fn resource<R: crate::resource::Resource>(&self) -> ResourceClient<'_, R> {
        ResourceClient::new(self)
    }

    pub fn users(&self) -> ResourceClient<'_, Users> {
        self.resource()
    }

    pub fn orders(&self) -> ResourceClient<'_, Orders> {
        self.resource()
    }

    pub fn order_items(&self) -> ResourceClient<'_, OrderItems> {
        self.resource()
    }

    pub fn products(&self) -> ResourceClient<'_, Products> {
        self.resource()
    }

    pub fn stores(&self) -> ResourceClient<'_, Stores> {
        self.resource()
    }

    pub fn reviews(&self) -> ResourceClient<'_, Reviews> {
        self.resource()
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/login", input)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        parse_json(response)
    }

    /// Parse a login response and cache its profile and token.
    pub fn complete_login(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        let auth = self.parse_login(response)?;
        self.session.sign_in(&auth)?;
        Ok(auth)
    }

    pub fn build_register(&self, input: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/register", input)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        parse_json(response)
    }

    pub fn build_me(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/auth/me", None)
    }

    pub fn parse_me(&self, response: HttpResponse) -> Result<UserProfile, ApiError> {
        parse_json(response)
    }

    pub fn build_dashboard_stats(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/dashboard/stats", None)
    }

    pub fn parse_dashboard_stats(&self, response: HttpResponse) -> Result<DashboardStats, ApiError> {
        parse_json(response)
    }

    /// Clear the credential cache. Purely local; the server keeps no session.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.logout()?;
        Ok(())
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "API error response");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Check the status, unwrap an envelope if present, and decode.
pub(crate) fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let value = parse_value(response)?;
    serde_json::from_value(value).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

pub(crate) fn parse_value(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response)?;
    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(unwrap_envelope(value))
}

/// The confirmation message of a delete: envelope `message`, a JSON string,
/// or the raw text body.
pub(crate) fn parse_message(response: HttpResponse) -> Result<String, ApiError> {
    check_status(&response)?;
    let body = response.body.trim();
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(message)) => Ok(message),
        Ok(value) => Ok(envelope_message(&value).unwrap_or_default().to_string()),
        Err(_) => Ok(body.to_string()),
    }
}
