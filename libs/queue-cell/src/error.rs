use thiserror::Error;
use uuid::Uuid;

use appointment_cell::AppointmentError;
use doctor_cell::DoctorError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error(transparent)]
    Doctor(#[from] DoctorError),

    #[error("Connection not found: {0}")]
    ConnectionNotFound(Uuid),

    #[error("Invalid client message: {0}")]
    InvalidMessage(String),

    #[error("Internal queue error: {0}")]
    Internal(String),
}

/// Failure classes the boundary maps to transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    Internal,
}

impl QueueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueueError::Appointment(AppointmentError::NotFound(_)) => ErrorKind::NotFound,
            QueueError::Appointment(_) => ErrorKind::InvalidArgument,
            QueueError::Doctor(DoctorError::NotFound(_)) => ErrorKind::NotFound,
            QueueError::Doctor(_) => ErrorKind::Internal,
            QueueError::ConnectionNotFound(_) => ErrorKind::NotFound,
            QueueError::InvalidMessage(_) => ErrorKind::InvalidArgument,
            QueueError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<QueueError> for AppError {
    fn from(e: QueueError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(e.to_string()),
            ErrorKind::InvalidArgument => AppError::BadRequest(e.to_string()),
            ErrorKind::Internal => {
                tracing::error!("Queue operation failed: {}", e);
                AppError::Internal("Internal server error".to_string())
            }
        }
    }
}
