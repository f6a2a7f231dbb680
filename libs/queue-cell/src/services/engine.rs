use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use appointment_cell::{Appointment, AppointmentStore};
use doctor_cell::DoctorDirectory;

use crate::QueueUpdate;

/// Derives queue order, positions and wait estimates from the store and the
/// doctor directory. Holds no state of its own.
pub struct QueueEngine {
    store: Arc<AppointmentStore>,
    directory: Arc<DoctorDirectory>,
}

impl QueueEngine {
    pub fn new(store: Arc<AppointmentStore>, directory: Arc<DoctorDirectory>) -> Self {
        Self { store, directory }
    }

    /// Waiting and in-progress appointments of a doctor, in FIFO order.
    pub async fn active_queue(&self, doctor_id: &str) -> Vec<Appointment> {
        let mut queue: Vec<Appointment> = self
            .store
            .list_by_doctor(doctor_id)
            .await
            .into_iter()
            .filter(Appointment::is_active)
            .collect();

        queue.sort_by_key(Appointment::queue_key);
        queue
    }

    pub async fn doctor_of(&self, appointment_id: Uuid) -> Option<String> {
        self.store
            .get(appointment_id)
            .await
            .map(|appointment| appointment.doctor_id)
    }

    /// 1-based rank, or `None` when unknown or not active.
    pub async fn position(&self, appointment_id: Uuid) -> Option<u32> {
        let (appointment, siblings) = self.store.doctor_snapshot(appointment_id).await?;
        rank_in(&appointment, siblings)
    }

    /// Minutes until the appointment is expected to start.
    pub async fn estimated_wait(&self, appointment_id: Uuid) -> Option<u32> {
        self.queue_status(appointment_id).await.estimated_wait_time
    }

    /// Position and wait estimate taken from a single store snapshot.
    pub async fn queue_status(&self, appointment_id: Uuid) -> QueueUpdate {
        let Some((appointment, siblings)) = self.store.doctor_snapshot(appointment_id).await else {
            return QueueUpdate::default();
        };

        let Some(position) = rank_in(&appointment, siblings) else {
            return QueueUpdate::default();
        };

        let estimated_wait_time = self
            .directory
            .get(&appointment.doctor_id)
            .await
            .map(|doctor| wait_minutes(position, doctor.average_consultation_time));

        QueueUpdate {
            position: Some(position),
            estimated_wait_time,
        }
    }

    /// Write position and wait estimate onto every active record of the
    /// doctor and clear them on the doctor's inactive records. Returns the
    /// active queue as written.
    pub async fn recompute_positions(&self, doctor_id: &str) -> Vec<Appointment> {
        let consultation_minutes = self
            .directory
            .get(doctor_id)
            .await
            .map(|doctor| doctor.average_consultation_time);

        let queue = self
            .store
            .update_doctor_records(doctor_id, |records| {
                records.sort_by_key(|record| record.queue_key());

                let mut queue = Vec::new();
                for record in records.iter_mut() {
                    if record.is_active() {
                        let position = queue.len() as u32 + 1;
                        record.position = Some(position);
                        record.estimated_wait_time =
                            consultation_minutes.map(|minutes| wait_minutes(position, minutes));
                        queue.push((**record).clone());
                    } else {
                        record.position = None;
                        record.estimated_wait_time = None;
                    }
                }
                queue
            })
            .await;

        debug!("Recomputed queue for doctor {}: {} active", doctor_id, queue.len());
        queue
    }
}

/// Every patient ahead consumes one full average consultation.
pub fn wait_minutes(position: u32, consultation_minutes: u32) -> u32 {
    position.saturating_sub(1).saturating_mul(consultation_minutes)
}

fn rank_in(appointment: &Appointment, siblings: Vec<Appointment>) -> Option<u32> {
    if !appointment.is_active() {
        return None;
    }

    let ahead = siblings
        .iter()
        .filter(|other| other.is_active() && other.queue_key() < appointment.queue_key())
        .count();

    Some(ahead as u32 + 1)
}
