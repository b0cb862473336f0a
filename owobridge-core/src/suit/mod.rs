// File: src/suit/mod.rs

use async_trait::async_trait;

use crate::Error;
use crate::models::{ConnectionState, Muscle, Sensation};

pub mod native;
pub mod simulated;

pub use native::NativeSuit;
pub use simulated::SimulatedSuit;

/// The vendor-side operations the bridge needs. Connect calls report success
/// through `connection_state`, not through their return value; an `Err` means
/// the call itself could not be made.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuitBackend: Send + Sync {
    async fn connect(&self, ip: &str) -> Result<(), Error>;
    async fn auto_connect(&self) -> Result<(), Error>;
    async fn connection_state(&self) -> ConnectionState;
    async fn send(&self, sensation: &Sensation, muscle: Muscle) -> Result<(), Error>;
}
