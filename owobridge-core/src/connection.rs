//! src/connection.rs
//!
//! Gets the suit connected and keeps observers informed. A failed attempt is
//! never an error to the caller: `retry_connect` keeps trying, forever, with a
//! fixed pause between attempts.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::eventbus::EventBus;
use crate::models::ConnectionState;
use crate::state::SuitState;
use crate::suit::SuitBackend;

pub struct ConnectionManager {
    backend: Arc<dyn SuitBackend>,
    state: Arc<SuitState>,
    event_bus: Arc<EventBus>,
    owo_ip: Option<String>,
    retry_interval: Duration,
}

impl ConnectionManager {
    pub fn new(
        backend: Arc<dyn SuitBackend>,
        state: Arc<SuitState>,
        event_bus: Arc<EventBus>,
        config: &AppConfig,
    ) -> Self {
        Self {
            backend,
            state,
            event_bus,
            owo_ip: config.owo_ip().map(str::to_string),
            retry_interval: config.retry_interval(),
        }
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// One attempt: the configured IP first (if any), then auto-discovery.
    pub async fn connect(&self) -> bool {
        if let Some(ip) = &self.owo_ip {
            debug!("OWO#Connect({ip}) begin");
            if let Err(e) = self.backend.connect(ip).await {
                warn!("Direct connect to {ip} failed: {e}");
            }
            debug!("OWO#Connect({ip}) end");
            if self.is_connected().await {
                return true;
            }
        }
        debug!("OWO#AutoConnect() begin");
        if let Err(e) = self.backend.auto_connect().await {
            warn!("Auto connect failed: {e}");
        }
        debug!("OWO#AutoConnect() end");
        self.is_connected().await
    }

    pub async fn is_connected(&self) -> bool {
        self.backend.connection_state().await == ConnectionState::Connected
    }

    /// State as observers should see it right now.
    pub async fn current_state(&self) -> ConnectionState {
        if self.state.is_connecting() {
            return ConnectionState::Connecting;
        }
        if self.is_connected().await {
            return ConnectionState::Connected;
        }
        ConnectionState::Disconnected
    }

    pub async fn dispatch_connection_state_change(&self) {
        let current = self.current_state().await;
        self.event_bus.publish_connection_state(current).await;
    }

    /// Connect, retrying until it works. Returns false without doing anything
    /// if another call is already connecting.
    pub async fn retry_connect(&self) -> bool {
        if !self.state.begin_connecting() {
            debug!("retry_connect ignored, already connecting");
            return false;
        }
        info!("Connecting to suit...");
        self.dispatch_connection_state_change().await;

        let mut attempts = 1u32;
        while !self.connect().await {
            debug!("Connect attempt {attempts} failed, retrying in {:?}", self.retry_interval);
            tokio::time::sleep(self.retry_interval).await;
            attempts += 1;
        }

        self.state.finish_connecting();
        if self.is_connected().await {
            info!("Connection complete!");
        }
        self.state.mark_connected();
        self.dispatch_connection_state_change().await;
        true
    }
}
