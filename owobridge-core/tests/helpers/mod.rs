//! tests/helpers/mod.rs
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use owobridge_core::Error;
use owobridge_core::models::{ConnectionState, Muscle, Sensation};
use owobridge_core::suit::SuitBackend;

/// Records every call. The first `fail_first` connect attempts leave it
/// disconnected.
pub struct RecordingSuit {
    pub state: Mutex<ConnectionState>,
    fail_first: AtomicU32,
    pub connect_calls: Mutex<Vec<String>>,
    pub auto_connect_calls: AtomicU32,
    pub sent: Mutex<Vec<(Sensation, Muscle)>>,
}

impl RecordingSuit {
    pub fn new(fail_first: u32) -> Self {
        Self {
            state: Mutex::new(ConnectionState::Disconnected),
            fail_first: AtomicU32::new(fail_first),
            connect_calls: Mutex::new(vec![]),
            auto_connect_calls: AtomicU32::new(0),
            sent: Mutex::new(vec![]),
        }
    }

    pub fn connected() -> Self {
        let suit = Self::new(0);
        *suit.state.lock().unwrap() = ConnectionState::Connected;
        suit
    }

    pub fn auto_connects(&self) -> u32 {
        self.auto_connect_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(Sensation, Muscle)> {
        self.sent.lock().unwrap().clone()
    }

    fn attempt(&self) {
        let failed = self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        *self.state.lock().unwrap() = if failed {
            ConnectionState::Disconnected
        } else {
            ConnectionState::Connected
        };
    }
}

#[async_trait]
impl SuitBackend for RecordingSuit {
    async fn connect(&self, ip: &str) -> Result<(), Error> {
        self.connect_calls.lock().unwrap().push(ip.to_string());
        self.attempt();
        Ok(())
    }

    async fn auto_connect(&self) -> Result<(), Error> {
        self.auto_connect_calls.fetch_add(1, Ordering::SeqCst);
        self.attempt();
        Ok(())
    }

    async fn connection_state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }

    async fn send(&self, sensation: &Sensation, muscle: Muscle) -> Result<(), Error> {
        self.sent.lock().unwrap().push((sensation.clone(), muscle));
        Ok(())
    }
}
