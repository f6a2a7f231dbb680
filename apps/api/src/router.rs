use std::sync::Arc;

use axum::{routing::get, Router};

use doctor_cell::{doctor_routes, DoctorDirectory};
use queue_cell::{create_queue_router, QueueState};

pub fn create_router(directory: Arc<DoctorDirectory>, state: Arc<QueueState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Telehealth queue API is running!" }))
        .nest("/doctors", doctor_routes(directory))
        .merge(create_queue_router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared_utils::test_utils::{empty_request, json_request, send, TestConfig};

    fn app() -> Router {
        let directory = Arc::new(DoctorDirectory::seeded());
        let state = QueueState::new(TestConfig::default().to_arc(), directory.clone());
        create_router(directory, Arc::new(state))
    }

    #[tokio::test]
    async fn test_liveness() {
        let (status, _) = send(app(), empty_request(Method::GET, "/")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_doctor_and_queue_routes_share_prefix() {
        let app = app();

        let (status, body) = send(app.clone(), empty_request(Method::GET, "/doctors")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, _) = send(
            app.clone(),
            json_request(Method::POST, "/appointments", &json!({ "patientName": "Alice", "doctorId": "doc1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app.clone(), empty_request(Method::GET, "/doctors/doc1/queue")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["queue"][0]["patientName"], "Alice");

        let (status, body) = send(app, empty_request(Method::GET, "/doctors/doc1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Dr. Smith");
    }
}
