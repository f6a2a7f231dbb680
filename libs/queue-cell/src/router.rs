use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};

use crate::handlers::{
    cancel_appointment,
    create_appointment,
    get_appointment,
    get_doctor_queue,
    list_appointments,
    update_appointment_status,
    websocket_upgrade,
    QueueState,
};

pub fn create_queue_router(state: Arc<QueueState>) -> Router {
    let appointment_routes = Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route("/appointments/{appointment_id}", get(get_appointment).delete(cancel_appointment))
        .route("/appointments/{appointment_id}/status", put(update_appointment_status));

    let queue_routes = Router::new()
        .route("/doctors/{doctor_id}/queue", get(get_doctor_queue))
        .route("/ws", get(websocket_upgrade));

    Router::new()
        .merge(appointment_routes)
        .merge(queue_routes)
        .with_state(state)
}
