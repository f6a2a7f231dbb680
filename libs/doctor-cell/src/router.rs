use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};

use crate::handlers;
use crate::services::DoctorDirectory;

pub fn doctor_routes(directory: Arc<DoctorDirectory>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/availability", put(handlers::update_availability))
        .with_state(directory)
}
