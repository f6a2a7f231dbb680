use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

use shared_config::AppConfig;

pub struct TestConfig {
    pub turn_alert_message: String,
    pub ws_channel_capacity: usize,
    pub strict_status_transitions: bool,
    pub doctors_seed_file: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            turn_alert_message: "Your turn, test patient".to_string(),
            ws_channel_capacity: 16,
            strict_status_transitions: false,
            doctors_seed_file: None,
        }
    }
}

impl TestConfig {
    pub fn strict() -> Self {
        Self {
            strict_status_transitions: true,
            ..Self::default()
        }
    }

    pub fn with_seed_file(path: &str) -> Self {
        Self {
            doctors_seed_file: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            doctors_seed_file: self.doctors_seed_file.clone(),
            turn_alert_message: self.turn_alert_message.clone(),
            ws_channel_capacity: self.ws_channel_capacity,
            strict_status_transitions: self.strict_status_transitions,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Request with a JSON body.
pub fn json_request<T: Serialize>(method: Method, uri: &str, body: &T) -> Request<Body> {
    let payload = serde_json::to_vec(body).expect("test body serializes");
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload))
        .expect("valid test request")
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid test request")
}

/// Drive one request through the router and decode the JSON body.
/// Non-JSON bodies decode as `Value::Null`.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
