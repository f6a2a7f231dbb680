use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use appointment_cell::{
    Appointment, AppointmentError, AppointmentLifecycleService, AppointmentStatus,
    AppointmentStore, CreateAppointmentRequest,
};
use doctor_cell::{DoctorDirectory, DoctorError};

use crate::{DoctorLocks, NotificationDispatcher, QueueEngine, QueueError, StatusChange};

/// Runs every state-changing operation as mutate, recompute, fan out, while
/// holding the affected doctor's lock.
pub struct QueueOrchestrator {
    store: Arc<AppointmentStore>,
    directory: Arc<DoctorDirectory>,
    engine: Arc<QueueEngine>,
    dispatcher: Arc<NotificationDispatcher>,
    lifecycle: AppointmentLifecycleService,
    locks: Arc<DoctorLocks>,
}

impl QueueOrchestrator {
    pub fn new(
        store: Arc<AppointmentStore>,
        directory: Arc<DoctorDirectory>,
        engine: Arc<QueueEngine>,
        dispatcher: Arc<NotificationDispatcher>,
        lifecycle: AppointmentLifecycleService,
    ) -> Self {
        let locks = dispatcher.locks();

        Self {
            store,
            directory,
            engine,
            dispatcher,
            lifecycle,
            locks,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, QueueError> {
        let request = request.validated()?;
        let doctor = self
            .directory
            .get(&request.doctor_id)
            .await
            .ok_or_else(|| DoctorError::NotFound(request.doctor_id.clone()))?;

        let _guard = self.locks.acquire(&doctor.id).await;

        let created = self.store.create(&request.patient_name, &doctor.id).await;
        info!("Appointment {} created for {} with {}", created.id, created.patient_name, doctor.id);

        let queue = self.engine.recompute_positions(&doctor.id).await;
        self.fan_out(&queue).await;

        queue
            .into_iter()
            .find(|appointment| appointment.id == created.id)
            .ok_or_else(|| {
                QueueError::Internal(format!("appointment {} missing from queue after create", created.id))
            })
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<StatusChange, QueueError> {
        let doctor_id = self
            .store
            .get(appointment_id)
            .await
            .ok_or_else(|| not_found(appointment_id))?
            .doctor_id;

        let _guard = self.locks.acquire(&doctor_id).await;

        let current = self
            .store
            .get(appointment_id)
            .await
            .ok_or_else(|| not_found(appointment_id))?;
        self.lifecycle.validate_status_transition(current.status, status)?;

        if !self.store.set_status(appointment_id, status).await {
            return Err(not_found(appointment_id));
        }
        info!("Appointment {} moved {} -> {}", appointment_id, current.status, status);

        let queue = self.engine.recompute_positions(&doctor_id).await;
        self.fan_out(&queue).await;

        // A patient who just left the queue still gets a final snapshot.
        if !queue.iter().any(|appointment| appointment.id == appointment_id) {
            self.dispatcher.push_queue_update(appointment_id).await;
        }

        let turn_alert = next_turn(status, appointment_id, &queue);
        if let Some(next) = turn_alert {
            self.dispatcher.push_turn_alert(next).await;
        }

        let appointment = self.store.get(appointment_id).await.ok_or_else(|| {
            QueueError::Internal(format!("appointment {} vanished during status update", appointment_id))
        })?;

        Ok(StatusChange {
            appointment,
            queue,
            turn_alert,
        })
    }

    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<StatusChange, QueueError> {
        self.update_status(appointment_id, AppointmentStatus::Cancelled).await
    }

    async fn fan_out(&self, queue: &[Appointment]) {
        for appointment in queue {
            self.dispatcher.push_queue_update(appointment.id).await;
        }
    }
}

/// Who gets the "your turn" alert after a status change.
///
/// Starting a consultation warns the patient on deck (position 2); finishing
/// or cancelling one alerts the new head of the queue.
pub fn next_turn(status: AppointmentStatus, changed: Uuid, queue: &[Appointment]) -> Option<Uuid> {
    match status {
        AppointmentStatus::InProgress => queue.get(1).map(|appointment| appointment.id),
        AppointmentStatus::Completed | AppointmentStatus::Cancelled => queue
            .first()
            .filter(|head| head.id != changed)
            .map(|head| head.id),
        AppointmentStatus::Scheduled | AppointmentStatus::Waiting => None,
    }
}

fn not_found(appointment_id: Uuid) -> QueueError {
    AppointmentError::NotFound(appointment_id.to_string()).into()
}
