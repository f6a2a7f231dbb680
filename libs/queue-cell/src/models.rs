use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointment_cell::Appointment;

pub type ConnectionId = Uuid;

/// Position snapshot pushed to a waiting patient. Both fields are null when
/// the appointment is unknown or no longer in an active queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueUpdate {
    pub position: Option<u32>,
    pub estimated_wait_time: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnAlert {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorNotice {
    pub message: String,
}

/// Server to client frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum QueueEvent {
    #[serde(rename = "queue:update")]
    QueueUpdate(QueueUpdate),

    #[serde(rename = "appointment:turn")]
    TurnAlert(TurnAlert),

    #[serde(rename = "error")]
    Error(ErrorNotice),
}

impl QueueEvent {
    pub fn error(message: impl Into<String>) -> Self {
        QueueEvent::Error(ErrorNotice {
            message: message.into(),
        })
    }
}

/// Client to server frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "subscribeToQueue")]
    SubscribeToQueue(String),

    #[serde(rename = "unsubscribeFromQueue")]
    UnsubscribeFromQueue,
}

/// Outcome of an orchestrated status change.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub appointment: Appointment,
    /// The doctor's active queue after recompute.
    pub queue: Vec<Appointment>,
    /// Appointment that received a turn alert, if any.
    pub turn_alert: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorQueueResponse {
    pub queue: Vec<Appointment>,
}
