#![allow(dead_code)]

use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;

use pocketbook_api::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use pocketbook_session::{RefreshUpdate, SessionStore};
use pocketbook_storage::Database;

/// Transport that replays scripted responses in order and records requests.
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| format!("{} {}", r.method, r.endpoint))
            .collect()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses.lock().pop_front().unwrap_or_else(|| {
            Err(TransportError::Unavailable(
                "no scripted response left".to_string(),
            ))
        })
    }
}

pub fn json(status: u16, body: Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(
        StatusCode::from_u16(status).unwrap(),
        serde_json::to_vec(&body).unwrap(),
    ))
}

pub fn empty(status: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(StatusCode::from_u16(status).unwrap(), Vec::new()))
}

pub fn offline() -> Result<HttpResponse, TransportError> {
    Err(TransportError::Unavailable("connection refused".to_string()))
}

/// Client over a fresh in-memory session holding the given tokens.
pub fn client_with_tokens(
    access: Option<&str>,
    refresh: Option<&str>,
    responses: Vec<Result<HttpResponse, TransportError>>,
) -> (ApiClient<FakeTransport>, Database) {
    let db = Database::open_in_memory().unwrap();
    let session = SessionStore::load(db.clone()).unwrap();
    let refresh = match refresh {
        Some(token) => RefreshUpdate::Set(token.to_string()),
        None => RefreshUpdate::Clear,
    };
    session.set_token(access, refresh).unwrap();

    (ApiClient::new(FakeTransport::new(responses), session), db)
}
