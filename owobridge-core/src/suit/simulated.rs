//! src/suit/simulated.rs
//!
//! A suit that lives in memory. Used when no vendor library is configured.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::Error;
use crate::models::{ConnectionState, Muscle, Sensation};
use crate::suit::SuitBackend;

pub struct SimulatedSuit {
    state: Mutex<ConnectionState>,
    failures_left: AtomicU32,
    sent: AtomicU64,
}

impl SimulatedSuit {
    pub fn new() -> Self {
        Self::failing_first(0)
    }

    /// The first `attempts` connect calls leave the suit disconnected.
    pub fn failing_first(attempts: u32) -> Self {
        Self {
            state: Mutex::new(ConnectionState::Disconnected),
            failures_left: AtomicU32::new(attempts),
            sent: AtomicU64::new(0),
        }
    }

    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }

    fn attempt(&self) {
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let next = if failed {
            ConnectionState::Disconnected
        } else {
            ConnectionState::Connected
        };
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = next;
    }
}

impl Default for SimulatedSuit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SuitBackend for SimulatedSuit {
    async fn connect(&self, ip: &str) -> Result<(), Error> {
        info!("(simulated) connect to {ip}");
        self.attempt();
        Ok(())
    }

    async fn auto_connect(&self) -> Result<(), Error> {
        info!("(simulated) auto connect");
        self.attempt();
        Ok(())
    }

    async fn connection_state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    async fn send(&self, sensation: &Sensation, muscle: Muscle) -> Result<(), Error> {
        if self.connection_state().await != ConnectionState::Connected {
            return Err(Error::Suit("simulated suit is not connected".into()));
        }
        self.sent.fetch_add(1, Ordering::SeqCst);
        info!(
            "(simulated) {muscle}: freq={} dur={}s intensity={}",
            sensation.frequency, sensation.duration, sensation.intensity
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_after_configured_failures() {
        let suit = SimulatedSuit::failing_first(2);
        suit.auto_connect().await.unwrap();
        assert_eq!(suit.connection_state().await, ConnectionState::Disconnected);
        suit.connect("10.0.0.5").await.unwrap();
        assert_eq!(suit.connection_state().await, ConnectionState::Disconnected);
        suit.auto_connect().await.unwrap();
        assert_eq!(suit.connection_state().await, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn send_requires_connection() {
        let suit = SimulatedSuit::new();
        let sensation = Sensation::new(50, 0.3, 10.0);
        assert!(suit.send(&sensation, Muscle::ArmL).await.is_err());

        suit.auto_connect().await.unwrap();
        suit.send(&sensation, Muscle::ArmL).await.unwrap();
        assert_eq!(suit.sent_count(), 1);
    }
}
