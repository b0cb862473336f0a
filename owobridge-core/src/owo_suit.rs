//! src/owo_suit.rs
//!
//! `OwoSuit` owns the shared state and the two long-running tasks (sender loop
//! and connection retries) and exposes the hooks a front-end needs.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use owobridge_osc::OscDispatcher;

use crate::Error;
use crate::address_map::AddressMap;
use crate::collision::CollisionHandler;
use crate::config::{AppConfig, BackendConfig};
use crate::connection::ConnectionManager;
use crate::eventbus::EventBus;
use crate::models::ControlCommand;
use crate::sender::SenderLoop;
use crate::state::SuitState;
use crate::suit::{NativeSuit, SimulatedSuit, SuitBackend};

#[derive(Clone)]
pub struct OwoSuit {
    config: Arc<AppConfig>,
    address_map: Arc<AddressMap>,
    state: Arc<SuitState>,
    event_bus: Arc<EventBus>,
    connection: Arc<ConnectionManager>,
    sender: Arc<SenderLoop>,
}

impl OwoSuit {
    pub fn new(config: AppConfig, backend: Arc<dyn SuitBackend>) -> Self {
        Self::with_address_map(config, AddressMap::default(), backend)
    }

    pub fn with_address_map(
        config: AppConfig,
        address_map: AddressMap,
        backend: Arc<dyn SuitBackend>,
    ) -> Self {
        let config = Arc::new(config);
        let address_map = Arc::new(address_map);
        let state = Arc::new(SuitState::new());
        let event_bus = Arc::new(EventBus::new());

        let connection = Arc::new(ConnectionManager::new(
            backend.clone(),
            state.clone(),
            event_bus.clone(),
            &config,
        ));
        let sender = Arc::new(SenderLoop::new(
            backend,
            state.clone(),
            address_map.clone(),
            config.clone(),
            event_bus.clone(),
        ));

        Self {
            config,
            address_map,
            state,
            event_bus,
            connection,
            sender,
        }
    }

    /// Build the backend the config asks for.
    pub fn backend_from_config(config: &AppConfig) -> Result<Arc<dyn SuitBackend>, Error> {
        match &config.backend {
            BackendConfig::Simulated => {
                info!("Using simulated suit backend.");
                Ok(Arc::new(SimulatedSuit::new()))
            }
            BackendConfig::Native { library_path } => {
                info!("Using native suit backend from {}", library_path.display());
                Ok(Arc::new(NativeSuit::load(library_path)?))
            }
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn address_map(&self) -> &AddressMap {
        &self.address_map
    }

    pub fn state(&self) -> Arc<SuitState> {
        self.state.clone()
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    pub fn connection(&self) -> Arc<ConnectionManager> {
        self.connection.clone()
    }

    pub fn sender(&self) -> Arc<SenderLoop> {
        self.sender.clone()
    }

    pub fn collision_handler(&self) -> CollisionHandler {
        CollisionHandler::new(self.address_map.clone(), self.state.clone())
    }

    /// Route every OSC message to the collision handler.
    pub fn map_parameters(&self, dispatcher: &mut OscDispatcher) {
        dispatcher.set_default_handler(Arc::new(self.collision_handler()));
    }

    /// Returns true if interactions are now paused.
    pub fn toggle_interactions(&self) -> bool {
        let paused = self.state.toggle_paused();
        if paused {
            info!("Interactions Paused.");
        } else {
            info!("Interactions Continued.");
        }
        paused
    }

    pub async fn retry_connect(&self) -> bool {
        self.connection.retry_connect().await
    }

    pub fn spawn_retry_connect(&self) -> JoinHandle<()> {
        let connection = self.connection.clone();
        tokio::spawn(async move {
            connection.retry_connect().await;
        })
    }

    pub fn spawn_watch(&self) -> JoinHandle<()> {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            sender.run().await;
        })
    }

    /// Handle front-end requests until the channel closes or the bus shuts down.
    pub fn spawn_command_listener(&self, mut commands: mpsc::Receiver<ControlCommand>) -> JoinHandle<()> {
        let suit = self.clone();
        let mut shutdown_rx = self.event_bus.shutdown_rx.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    cmd = commands.recv() => {
                        let Some(cmd) = cmd else { break };
                        debug!("Control command: {:?}", cmd);
                        match cmd {
                            ControlCommand::Connect => {
                                suit.spawn_retry_connect();
                            }
                            ControlCommand::ToggleInteractions => {
                                suit.toggle_interactions();
                            }
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Start the sender loop and the command listener.
    pub fn init(&self, commands: mpsc::Receiver<ControlCommand>) -> Vec<JoinHandle<()>> {
        vec![self.spawn_watch(), self.spawn_command_listener(commands)]
    }

    pub fn shutdown(&self) {
        self.event_bus.shutdown();
    }
}
