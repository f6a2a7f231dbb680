use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use appointment_cell::{
    Appointment, AppointmentError, AppointmentLifecycleService, AppointmentStatus,
    AppointmentStore, CreateAppointmentRequest, UpdateStatusRequest,
};
use doctor_cell::{DoctorDirectory, DoctorError};
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::{
    handle_socket, DoctorQueueResponse, NotificationDispatcher, QueueEngine, QueueError,
    QueueOrchestrator,
};

/// Everything the queue routes share. One instance per process.
pub struct QueueState {
    pub config: Arc<AppConfig>,
    pub store: Arc<AppointmentStore>,
    pub directory: Arc<DoctorDirectory>,
    pub engine: Arc<QueueEngine>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub orchestrator: QueueOrchestrator,
}

impl QueueState {
    pub fn new(config: Arc<AppConfig>, directory: Arc<DoctorDirectory>) -> Self {
        let store = Arc::new(AppointmentStore::new());
        let engine = Arc::new(QueueEngine::new(store.clone(), directory.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            engine.clone(),
            config.turn_alert_message.clone(),
        ));
        let orchestrator = QueueOrchestrator::new(
            store.clone(),
            directory.clone(),
            engine.clone(),
            dispatcher.clone(),
            AppointmentLifecycleService::new(config.strict_status_transitions),
        );

        Self {
            config,
            store,
            directory,
            engine,
            dispatcher,
            orchestrator,
        }
    }
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

pub async fn create_appointment(
    State(state): State<Arc<QueueState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    info!("Create appointment request for doctor: {}", request.doctor_id);

    let appointment = state.orchestrator.create_appointment(request).await?;

    Ok(Json(appointment))
}

pub async fn list_appointments(
    State(state): State<Arc<QueueState>>,
) -> Json<Vec<Appointment>> {
    let mut appointments = state.store.list().await;
    appointments.sort_by_key(Appointment::queue_key);
    Json(appointments)
}

pub async fn get_appointment(
    State(state): State<Arc<QueueState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let id = parse_appointment_id(&appointment_id)?;

    let appointment = state
        .store
        .get(id)
        .await
        .ok_or_else(|| QueueError::from(AppointmentError::NotFound(appointment_id)))?;

    Ok(Json(appointment))
}

pub async fn update_appointment_status(
    State(state): State<Arc<QueueState>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    info!("Status update request for appointment {}: {}", appointment_id, request.status);

    let status = AppointmentStatus::from_str(&request.status).map_err(QueueError::from)?;
    let id = parse_appointment_id(&appointment_id)?;

    state.orchestrator.update_status(id, status).await?;

    Ok(Json(json!({
        "success": true
    })))
}

pub async fn cancel_appointment(
    State(state): State<Arc<QueueState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    info!("Cancel request for appointment {}", appointment_id);

    let id = parse_appointment_id(&appointment_id)?;
    state.orchestrator.cancel_appointment(id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully"
    })))
}

// ==============================================================================
// QUEUE HANDLERS
// ==============================================================================

pub async fn get_doctor_queue(
    State(state): State<Arc<QueueState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorQueueResponse>, AppError> {
    if state.directory.get(&doctor_id).await.is_none() {
        return Err(QueueError::from(DoctorError::NotFound(doctor_id)).into());
    }

    let queue = state.engine.active_queue(&doctor_id).await;

    Ok(Json(DoctorQueueResponse { queue }))
}

pub async fn websocket_upgrade(
    ws: WebSocketUpgrade,
    State(state): State<Arc<QueueState>>,
) -> impl IntoResponse {
    let dispatcher = state.dispatcher.clone();
    let capacity = state.config.ws_channel_capacity;

    ws.on_upgrade(move |socket| handle_socket(socket, dispatcher, capacity))
}

/// Malformed ids cannot name an appointment, so they read as not found.
fn parse_appointment_id(raw: &str) -> Result<Uuid, QueueError> {
    Uuid::parse_str(raw).map_err(|_| AppointmentError::NotFound(raw.to_string()).into())
}
