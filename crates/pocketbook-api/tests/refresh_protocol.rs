mod support;

use reqwest::Method;
use serde_json::{json, Value};

use pocketbook_api::{ApiError, AuthEvent, EndReason};
use pocketbook_session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use support::{client_with_tokens, empty, json, offline};

#[tokio::test]
async fn attaches_bearer_and_returns_body() {
    let (client, _db) = client_with_tokens(
        Some("valid"),
        Some("refresh-1"),
        vec![json(200, json!({"ok": true}))],
    );

    let body: Value = client.get("/categories/").await.unwrap();

    assert_eq!(body, json!({"ok": true}));
    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer(), Some("valid"));
    assert_eq!(
        requests[0].headers.get(reqwest::header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn anonymous_request_has_no_authorization_header() {
    let (client, _db) = client_with_tokens(None, None, vec![json(200, json!([]))]);

    let _: Value = client.get("/categories/").await.unwrap();

    let requests = client.transport().requests();
    assert!(requests[0]
        .headers
        .get(reqwest::header::AUTHORIZATION)
        .is_none());
}

#[tokio::test]
async fn expired_token_refreshes_and_retries_once() {
    let (client, db) = client_with_tokens(
        Some("expired"),
        Some("refresh-1"),
        vec![
            json(401, json!({"detail": "Given token not valid"})),
            json(200, json!({"access": "fresh"})),
            json(200, json!({"retried": true})),
        ],
    );

    let body: Value = client
        .request(Method::POST, "/budgets/", Some(json!({"year": 2024})))
        .await
        .unwrap();

    assert_eq!(body, json!({"retried": true}));

    let requests = client.transport().requests();
    assert_eq!(
        client.transport().endpoints(),
        vec![
            "POST /budgets/",
            "POST /token/refresh/",
            "POST /budgets/"
        ]
    );
    assert_eq!(requests[0].bearer(), Some("expired"));
    assert_eq!(requests[1].bearer(), None);
    assert_eq!(requests[1].json_body(), Some(json!({"refresh": "refresh-1"})));
    assert_eq!(requests[2].bearer(), Some("fresh"));
    assert_eq!(requests[2].body, requests[0].body);

    // Refresh response omitted `refresh`: the old one is kept
    assert_eq!(client.session().access_token().as_deref(), Some("fresh"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("refresh-1"));
    assert_eq!(db.get_item(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn rotated_refresh_token_is_stored() {
    let (client, db) = client_with_tokens(
        Some("expired"),
        Some("refresh-1"),
        vec![
            empty(401),
            json(200, json!({"access": "fresh", "refresh": "refresh-2"})),
            json(200, json!([])),
        ],
    );

    let _: Value = client.get("/categories/").await.unwrap();

    assert_eq!(client.session().refresh_token().as_deref(), Some("refresh-2"));
    assert_eq!(
        db.get_item(REFRESH_TOKEN_KEY).unwrap().as_deref(),
        Some("refresh-2")
    );
}

#[tokio::test]
async fn failed_refresh_expires_session_and_clears_tokens() {
    let (client, db) = client_with_tokens(
        Some("expired"),
        Some("revoked"),
        vec![empty(401), json(401, json!({"detail": "Token is blacklisted"}))],
    );
    let mut events = client.subscribe();

    let err = client.get::<Value>("/categories/").await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(err.to_string(), "Session expired");
    assert_eq!(client.transport().request_count(), 2);
    assert_eq!(client.session().access_token(), None);
    assert_eq!(client.session().refresh_token(), None);
    assert_eq!(db.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(db.get_item(REFRESH_TOKEN_KEY).unwrap(), None);
    assert_eq!(
        events.try_recv().unwrap(),
        AuthEvent::SessionEnded {
            reason: EndReason::SessionExpired
        }
    );
}

#[tokio::test]
async fn refresh_network_failure_expires_session() {
    let (client, _db) = client_with_tokens(
        Some("expired"),
        Some("refresh-1"),
        vec![empty(401), offline()],
    );

    let err = client.get::<Value>("/budgets/").await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert!(!client.session().is_authenticated());
    assert_eq!(client.session().refresh_token(), None);
}

#[tokio::test]
async fn malformed_refresh_response_expires_session() {
    let (client, db) = client_with_tokens(
        Some("expired"),
        Some("refresh-1"),
        vec![empty(401), json(200, json!({"token": "wrong-shape"}))],
    );
    let mut events = client.subscribe();

    let err = client.get::<Value>("/budgets/").await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired));
    assert_eq!(client.transport().request_count(), 2);
    assert_eq!(client.session().access_token(), None);
    assert_eq!(client.session().refresh_token(), None);
    assert_eq!(db.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(db.get_item(REFRESH_TOKEN_KEY).unwrap(), None);
    assert_eq!(
        events.try_recv().unwrap(),
        AuthEvent::SessionEnded {
            reason: EndReason::SessionExpired
        }
    );
}

#[tokio::test]
async fn unauthorized_without_refresh_token_clears_session() {
    let (client, db) = client_with_tokens(Some("expired"), None, vec![empty(401)]);
    let mut events = client.subscribe();

    let err = client.get::<Value>("/transactions/").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.to_string(), "Unauthorized");
    assert_eq!(client.transport().request_count(), 1);
    assert_eq!(client.session().access_token(), None);
    assert_eq!(db.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(
        events.try_recv().unwrap(),
        AuthEvent::SessionEnded {
            reason: EndReason::Unauthorized
        }
    );
}

#[tokio::test]
async fn second_401_after_retry_is_not_refreshed_again() {
    let (client, _db) = client_with_tokens(
        Some("expired"),
        Some("refresh-1"),
        vec![
            empty(401),
            json(200, json!({"access": "fresh"})),
            empty(401),
            // Would be consumed by a second refresh attempt
            json(200, json!({"access": "fresher"})),
        ],
    );

    let err = client.get::<Value>("/budgets/").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(client.transport().request_count(), 3);
    assert_eq!(client.session().access_token(), None);
    assert_eq!(client.session().refresh_token(), None);
}

#[tokio::test]
async fn refresh_token_without_access_is_never_used() {
    let (client, _db) = client_with_tokens(None, Some("orphan"), vec![empty(401)]);

    let err = client.get::<Value>("/budgets/").await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(client.transport().endpoints(), vec!["GET /budgets/"]);
    assert_eq!(client.session().refresh_token(), None);
}

#[tokio::test]
async fn explicit_refresh_without_token_makes_no_call() {
    let (client, _db) = client_with_tokens(Some("access"), None, Vec::new());

    let err = client.refresh_access_token().await.unwrap_err();

    assert!(matches!(err, ApiError::NoRefreshToken));
    assert_eq!(err.to_string(), "No refresh token available");
    assert_eq!(client.transport().request_count(), 0);
    // Nothing to clear: the precondition failure leaves the session alone
    assert_eq!(client.session().access_token().as_deref(), Some("access"));
}

#[tokio::test]
async fn error_detail_is_surfaced_verbatim() {
    let (client, _db) = client_with_tokens(
        Some("valid"),
        Some("refresh-1"),
        vec![json(400, json!({"detail": "X"}))],
    );

    let err = client.get::<Value>("/budgets/").await.unwrap_err();

    assert_eq!(err.to_string(), "X");
    assert!(matches!(err, ApiError::Api { status: 400, .. }));
    // Business errors leave the session intact
    assert_eq!(client.session().access_token().as_deref(), Some("valid"));
}

#[tokio::test]
async fn unparseable_error_body_uses_generic_message() {
    let (client, _db) = client_with_tokens(Some("valid"), None, vec![empty(500)]);

    let err = client.get::<Value>("/budgets/").await.unwrap_err();

    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let (client, _db) = client_with_tokens(Some("valid"), Some("refresh-1"), vec![offline()]);

    let err = client.get::<Value>("/budgets/").await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(client.transport().request_count(), 1);
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn login_stores_tokens_and_returns_payload() {
    let (client, db) = client_with_tokens(
        None,
        None,
        vec![json(200, json!({"access": "a-1", "refresh": "r-1", "user": "sam"}))],
    );

    let response = client.login("sam", "secret").await.unwrap();

    assert_eq!(response.tokens.access, "a-1");
    assert_eq!(response.tokens.refresh, "r-1");
    assert_eq!(response.raw["user"], "sam");

    let requests = client.transport().requests();
    assert_eq!(client.transport().endpoints(), vec!["POST /token/"]);
    assert_eq!(requests[0].bearer(), None);
    assert_eq!(
        requests[0].json_body(),
        Some(json!({"username": "sam", "password": "secret"}))
    );

    assert_eq!(client.session().access_token().as_deref(), Some("a-1"));
    assert_eq!(db.get_item(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("r-1"));
}

#[tokio::test]
async fn failed_login_stores_nothing() {
    let (client, db) = client_with_tokens(
        None,
        None,
        vec![json(401, json!({"detail": "No active account found"}))],
    );

    let err = client.login("sam", "wrong").await.unwrap_err();

    assert!(matches!(err, ApiError::LoginFailed));
    assert_eq!(err.to_string(), "Login failed");
    assert!(!client.session().is_authenticated());
    assert_eq!(db.get_item(ACCESS_TOKEN_KEY).unwrap(), None);
    assert_eq!(db.get_item(REFRESH_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn logout_clears_tokens_and_notifies() {
    let (client, db) = client_with_tokens(Some("a-1"), Some("r-1"), Vec::new());
    let mut events = client.subscribe();

    client.logout().unwrap();

    assert_eq!(client.session().access_token(), None);
    assert_eq!(client.session().refresh_token(), None);
    assert_eq!(db.get_item(REFRESH_TOKEN_KEY).unwrap(), None);
    assert_eq!(client.transport().request_count(), 0);
    assert_eq!(
        events.try_recv().unwrap(),
        AuthEvent::SessionEnded {
            reason: EndReason::LoggedOut
        }
    );
}
