use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One mutex per doctor. Holding the guard serializes the
/// mutate, recompute and dispatch sequence for that doctor's queue.
#[derive(Debug, Default)]
pub struct DoctorLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, doctor_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(doctor_id.to_string()).or_default().clone()
        };

        lock.lock_owned().await
    }
}
