use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use shared_models::error::AppError;

use crate::models::{Doctor, DoctorError, UpdateAvailabilityRequest};
use crate::services::DoctorDirectory;

pub async fn list_doctors(
    State(directory): State<Arc<DoctorDirectory>>,
) -> Json<Vec<Doctor>> {
    Json(directory.list_all().await)
}

pub async fn get_doctor(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = directory
        .get(&doctor_id)
        .await
        .ok_or(DoctorError::NotFound(doctor_id))?;

    Ok(Json(doctor))
}

pub async fn update_availability(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<String>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    if !directory.set_availability(&doctor_id, request.is_available).await {
        return Err(DoctorError::NotFound(doctor_id).into());
    }

    info!("Doctor {} is now {}", doctor_id, if request.is_available { "available" } else { "unavailable" });

    Ok(Json(json!({
        "success": true
    })))
}
