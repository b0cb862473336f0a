//! src/eventbus.rs
//!
//! In-process fan-out of `SuitEvent`s to every front-end that subscribed,
//! one bounded MPSC queue per subscriber.

use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::models::{ConnectionState, SuitEvent};

/// Each subscriber gets its own `mpsc::Sender<SuitEvent>`.
///
/// - A subscriber whose queue is full misses the event; the sender loop
///   never waits on a stalled front-end.
/// - Subscribers that dropped their `Receiver` are pruned on the next publish.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<SuitEvent>>>>,
    shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

const DEFAULT_BUFFER_SIZE: usize = 1024;

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<SuitEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Returns how many subscribers the event was queued for.
    pub async fn publish(&self, event: SuitEvent) -> usize {
        let mut subs = self.subscribers.lock().await;
        subs.retain(|s| !s.is_closed());
        let mut delivered = 0;
        for s in subs.iter() {
            match s.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(evt)) => {
                    warn!("Subscriber queue full, dropping {}", evt.event_type());
                }
                Err(TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    pub async fn publish_connection_state(&self, state: ConnectionState) {
        self.publish(SuitEvent::ConnectionStateChanged(state)).await;
    }

    pub async fn publish_muscle_update(&self, parameter: &str) {
        self.publish(SuitEvent::ActiveMuscleUpdate { parameter: parameter.to_string() }).await;
    }

    pub async fn publish_muscle_reset(&self) {
        self.publish(SuitEvent::ActiveMuscleReset).await;
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
