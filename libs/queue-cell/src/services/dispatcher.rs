use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{ConnectionId, DoctorLocks, QueueEngine, QueueError, QueueEvent, TurnAlert};

pub type EventSender = mpsc::Sender<QueueEvent>;
pub type EventReceiver = mpsc::Receiver<QueueEvent>;

struct ConnectionEntry {
    sender: EventSender,
    appointment_id: Option<Uuid>,
}

#[derive(Default)]
struct Bindings {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    /// Inverted index: appointment to the connections watching it.
    subscribers: HashMap<Uuid, HashSet<ConnectionId>>,
}

impl Bindings {
    fn unbind(&mut self, connection_id: ConnectionId) -> Option<Uuid> {
        let entry = self.connections.get_mut(&connection_id)?;
        let appointment_id = entry.appointment_id.take()?;

        if let Some(watchers) = self.subscribers.get_mut(&appointment_id) {
            watchers.remove(&connection_id);
            if watchers.is_empty() {
                self.subscribers.remove(&appointment_id);
            }
        }

        Some(appointment_id)
    }

    fn senders_for(&self, appointment_id: Uuid) -> Vec<(ConnectionId, EventSender)> {
        self.subscribers
            .get(&appointment_id)
            .into_iter()
            .flatten()
            .filter_map(|connection_id| {
                self.connections
                    .get(connection_id)
                    .map(|entry| (*connection_id, entry.sender.clone()))
            })
            .collect()
    }
}

/// Tracks which live connection watches which appointment and pushes
/// queue events to exactly those connections.
pub struct NotificationDispatcher {
    engine: Arc<QueueEngine>,
    locks: Arc<DoctorLocks>,
    bindings: RwLock<Bindings>,
    turn_message: String,
}

impl NotificationDispatcher {
    pub fn new(engine: Arc<QueueEngine>, turn_message: impl Into<String>) -> Self {
        Self {
            engine,
            locks: Arc::new(DoctorLocks::new()),
            bindings: RwLock::new(Bindings::default()),
            turn_message: turn_message.into(),
        }
    }

    /// Per-doctor locks shared with whoever mutates the queues.
    pub fn locks(&self) -> Arc<DoctorLocks> {
        self.locks.clone()
    }

    pub fn channel(capacity: usize) -> (EventSender, EventReceiver) {
        mpsc::channel(capacity.max(1))
    }

    /// Attach a live connection. It receives nothing until it subscribes.
    pub async fn register(&self, connection_id: ConnectionId, sender: EventSender) {
        let mut bindings = self.bindings.write().await;
        bindings.unbind(connection_id);
        bindings.connections.insert(
            connection_id,
            ConnectionEntry {
                sender,
                appointment_id: None,
            },
        );
        debug!("Registered connection {}", connection_id);
    }

    /// Bind the connection to an appointment, replacing any previous binding,
    /// and push it a fresh position snapshot straight away. The snapshot is
    /// taken under the doctor's lock so it cannot overtake a mutation's push.
    pub async fn subscribe(
        &self,
        connection_id: ConnectionId,
        appointment_id: Uuid,
    ) -> Result<(), QueueError> {
        let sender = {
            let mut bindings = self.bindings.write().await;
            if !bindings.connections.contains_key(&connection_id) {
                return Err(QueueError::ConnectionNotFound(connection_id));
            }

            if let Some(previous) = bindings.unbind(connection_id) {
                debug!("Connection {} dropped interest in {}", connection_id, previous);
            }

            let entry = bindings
                .connections
                .get_mut(&connection_id)
                .ok_or(QueueError::ConnectionNotFound(connection_id))?;
            entry.appointment_id = Some(appointment_id);
            let sender = entry.sender.clone();

            bindings
                .subscribers
                .entry(appointment_id)
                .or_default()
                .insert(connection_id);
            sender
        };

        info!("Connection {} subscribed to appointment {}", connection_id, appointment_id);

        let _guard = match self.engine.doctor_of(appointment_id).await {
            Some(doctor_id) => Some(self.locks.acquire(&doctor_id).await),
            None => None,
        };

        let update = self.engine.queue_status(appointment_id).await;
        deliver(connection_id, &sender, QueueEvent::QueueUpdate(update));
        Ok(())
    }

    /// Drop the connection's appointment binding. The connection stays registered.
    pub async fn unsubscribe(&self, connection_id: ConnectionId) -> Option<Uuid> {
        let mut bindings = self.bindings.write().await;
        let previous = bindings.unbind(connection_id);
        if let Some(appointment_id) = previous {
            debug!("Connection {} unsubscribed from {}", connection_id, appointment_id);
        }
        previous
    }

    pub async fn disconnect(&self, connection_id: ConnectionId) {
        let mut bindings = self.bindings.write().await;
        bindings.unbind(connection_id);
        if bindings.connections.remove(&connection_id).is_some() {
            debug!("Connection {} removed", connection_id);
        }
    }

    /// Push current position and wait estimate to every connection watching
    /// the appointment. Returns how many connections accepted the event.
    pub async fn push_queue_update(&self, appointment_id: Uuid) -> usize {
        let targets = self.bindings.read().await.senders_for(appointment_id);
        if targets.is_empty() {
            return 0;
        }

        let update = self.engine.queue_status(appointment_id).await;
        debug!(
            "Queue update for {}: position {:?}, wait {:?}",
            appointment_id, update.position, update.estimated_wait_time
        );

        broadcast(&targets, QueueEvent::QueueUpdate(update))
    }

    /// One-shot "your turn" notice.
    pub async fn push_turn_alert(&self, appointment_id: Uuid) -> usize {
        let targets = self.bindings.read().await.senders_for(appointment_id);
        if targets.is_empty() {
            debug!("No subscriber for turn alert on {}", appointment_id);
            return 0;
        }

        info!("Sending turn alert for appointment {}", appointment_id);
        let alert = QueueEvent::TurnAlert(TurnAlert {
            message: self.turn_message.clone(),
        });

        broadcast(&targets, alert)
    }

    pub async fn connection_count(&self) -> usize {
        self.bindings.read().await.connections.len()
    }

    /// Connections currently bound to some appointment.
    pub async fn subscription_count(&self) -> usize {
        self.bindings
            .read()
            .await
            .subscribers
            .values()
            .map(HashSet::len)
            .sum()
    }

    pub async fn subscribers_of(&self, appointment_id: Uuid) -> Vec<ConnectionId> {
        self.bindings
            .read()
            .await
            .senders_for(appointment_id)
            .into_iter()
            .map(|(connection_id, _)| connection_id)
            .collect()
    }
}

fn broadcast(targets: &[(ConnectionId, EventSender)], event: QueueEvent) -> usize {
    targets
        .iter()
        .filter(|(connection_id, sender)| deliver(*connection_id, sender, event.clone()))
        .count()
}

fn deliver(connection_id: ConnectionId, sender: &EventSender, event: QueueEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            warn!("Outbound buffer full for connection {}, dropping event", connection_id);
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("Connection {} already closed, dropping event", connection_id);
            false
        }
    }
}
