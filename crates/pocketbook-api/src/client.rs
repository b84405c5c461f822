//! Authenticated API client
//!
//! Every request carries `Content-Type: application/json` and, when a session
//! exists, `Authorization: Bearer <access>`. A 401 with a usable refresh token
//! triggers one refresh followed by one retry of the original request. Any
//! other 401 ends the session.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast;

use pocketbook_session::{RefreshUpdate, SessionStore};

use crate::error::ApiError;
use crate::models::TokenPair;
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::Result;

const LOGIN_ENDPOINT: &str = "/token/";
const REFRESH_ENDPOINT: &str = "/token/refresh/";
const GENERIC_FAILURE: &str = "Request failed";
const EVENT_CAPACITY: usize = 16;

/// Why the signed-in session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A 401 that could not be recovered
    Unauthorized,
    /// The refresh token was rejected or the refresh call failed
    SessionExpired,
    /// Explicit logout
    LoggedOut,
}

/// Published when front ends should return to the login entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SessionEnded { reason: EndReason },
}

/// Successful login: the stored token pair plus the raw payload.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub tokens: TokenPair,
    pub raw: Value,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

pub struct ApiClient<T> {
    transport: Arc<T>,
    session: SessionStore,
    events: broadcast::Sender<AuthEvent>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, session: SessionStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport: Arc::new(transport),
            session,
            events,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Receive [`AuthEvent`]s published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Perform an authenticated JSON request and decode the response body.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<R> {
        let body = body.map(|b| serde_json::to_vec(&b)).transpose()?;
        let response = self.send_authorized(&method, endpoint, body).await?;
        Ok(response.json()?)
    }

    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        self.request(Method::GET, endpoint, None).await
    }

    pub async fn post<R: DeserializeOwned>(&self, endpoint: &str, body: Value) -> Result<R> {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<R: DeserializeOwned>(&self, endpoint: &str, body: Value) -> Result<R> {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        let _: Value = self.request(Method::DELETE, endpoint, None).await?;
        Ok(())
    }

    async fn send_authorized(
        &self,
        method: &Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        let mut retried = false;

        loop {
            let access = self.session.access_token();
            let request = HttpRequest {
                method: method.clone(),
                endpoint: endpoint.to_string(),
                headers: build_headers(access.as_deref()),
                body: body.clone(),
            };

            let response = self.transport.send(request).await?;

            tracing::debug!(
                method = %method,
                endpoint = %endpoint,
                status = response.status.as_u16(),
                retried,
                "API response"
            );

            if response.status != StatusCode::UNAUTHORIZED {
                return ensure_success(response);
            }

            if !retried && self.session.usable_refresh_token().is_some() {
                if let Err(e) = self.refresh_access_token().await {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Token refresh failed");
                    return Err(ApiError::SessionExpired);
                }
                retried = true;
                continue;
            }

            self.end_session(EndReason::Unauthorized);
            return Err(ApiError::Unauthorized);
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Fails with [`ApiError::NoRefreshToken`] without touching the network when
    /// no usable refresh token is held. Any other failure ends the session.
    pub async fn refresh_access_token(&self) -> Result<String> {
        let Some(refresh) = self.session.usable_refresh_token() else {
            return Err(ApiError::NoRefreshToken);
        };

        match self.exchange_refresh_token(&refresh).await {
            Ok(access) => {
                tracing::info!("Refreshed access token");
                Ok(access)
            }
            Err(e) => {
                self.end_session(EndReason::SessionExpired);
                Err(e)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh: &str) -> Result<String> {
        let body = serde_json::to_vec(&json!({ "refresh": refresh }))?;
        let response = self
            .transport
            .send(HttpRequest {
                method: Method::POST,
                endpoint: REFRESH_ENDPOINT.to_string(),
                headers: build_headers(None),
                body: Some(body),
            })
            .await?;

        if !response.is_success() {
            return Err(ApiError::RefreshFailed(response.status.as_u16()));
        }

        let payload: RefreshResponse = response.json()?;
        let rotated = payload.refresh.filter(|r| !r.trim().is_empty());
        self.session
            .set_token(Some(payload.access.as_str()), RefreshUpdate::rotate_or_keep(rotated))?;

        Ok(payload.access)
    }

    /// Exchange credentials for a token pair and store it.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = serde_json::to_vec(&json!({ "username": username, "password": password }))?;
        let response = self
            .transport
            .send(HttpRequest {
                method: Method::POST,
                endpoint: LOGIN_ENDPOINT.to_string(),
                headers: build_headers(None),
                body: Some(body),
            })
            .await?;

        if !response.is_success() {
            tracing::warn!(
                username = %username,
                status = response.status.as_u16(),
                "Login rejected"
            );
            return Err(ApiError::LoginFailed);
        }

        let raw: Value = response.json()?;
        let tokens: TokenPair = serde_json::from_value(raw.clone())?;
        self.session
            .set_token(Some(tokens.access.as_str()), RefreshUpdate::Set(tokens.refresh.clone()))?;

        tracing::info!(username = %username, "Logged in");

        Ok(LoginResponse { tokens, raw })
    }

    /// Forget both tokens and tell subscribers the session is over.
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        self.publish(EndReason::LoggedOut);
        Ok(())
    }

    fn end_session(&self, reason: EndReason) {
        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "Failed to clear session tokens");
        }
        tracing::warn!(reason = ?reason, "Session ended");
        self.publish(reason);
    }

    fn publish(&self, reason: EndReason) {
        // No subscribers is fine
        let _ = self.events.send(AuthEvent::SessionEnded { reason });
    }
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: self.session.clone(),
            events: self.events.clone(),
        }
    }
}

fn build_headers(access: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(access) = access {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {access}")) {
            headers.insert(AUTHORIZATION, value);
        }
    }
    headers
}

fn ensure_success(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }

    Err(ApiError::Api {
        status: response.status.as_u16(),
        message: error_message(&response.body),
    })
}

/// Human-readable message from an error body.
///
/// Looks at `detail`, then `non_field_errors`, then the first field error in
/// body order.
fn error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return GENERIC_FAILURE.to_string();
    };

    if let Some(detail) = value.get("detail").and_then(Value::as_str) {
        return detail.to_string();
    }

    if let Some(message) = value.get("non_field_errors").and_then(first_message) {
        return message;
    }

    match &value {
        Value::Object(fields) => fields
            .iter()
            .find_map(|(field, v)| first_message(v).map(|m| format!("{field}: {m}")))
            .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        other => first_message(other).unwrap_or_else(|| GENERIC_FAILURE.to_string()),
    }
}

fn first_message(value: &Value) -> Option<String> {
    let message = match value {
        Value::String(s) => s.trim(),
        Value::Array(items) => items.iter().find_map(Value::as_str)?.trim(),
        _ => return None,
    };
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_without_token() {
        let headers = build_headers(None);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_with_token() {
        let headers = build_headers(Some("abc"));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_error_message_detail() {
        assert_eq!(error_message(br#"{"detail": "X"}"#), "X");
    }

    #[test]
    fn test_error_message_non_field_errors() {
        let body = br#"{"non_field_errors": ["Budget for 2024-05 already exists."]}"#;
        assert_eq!(error_message(body), "Budget for 2024-05 already exists.");
    }

    #[test]
    fn test_error_message_field_error() {
        let body = br#"{"category": ["Category does not belong to the user."]}"#;
        assert_eq!(
            error_message(body),
            "category: Category does not belong to the user."
        );
    }

    #[test]
    fn test_error_message_uses_first_field_in_body() {
        let body = br#"{"date": ["Enter a valid date."], "amount": ["A valid number is required."]}"#;
        assert_eq!(error_message(body), "date: Enter a valid date.");
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(error_message(b""), GENERIC_FAILURE);
        assert_eq!(error_message(b"<html>oops</html>"), GENERIC_FAILURE);
        assert_eq!(error_message(br#"{"detail": 5}"#), GENERIC_FAILURE);
        assert_eq!(error_message(br#"["Only message"]"#), "Only message");
    }

    #[test]
    fn test_ensure_success_maps_status() {
        let response = HttpResponse::new(StatusCode::BAD_REQUEST, br#"{"detail": "bad"}"#.to_vec());
        match ensure_success(response) {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
