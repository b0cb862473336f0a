//! src/collision.rs
//!
//! Turns avatar collision parameters into active-muscle updates.

use std::sync::Arc;

use tracing::trace;

use owobridge_osc::{OscHandler, OscType};

use crate::address_map::AddressMap;
use crate::state::SuitState;

/// Default OSC handler. Anything that is not a known address carrying exactly
/// one bool is dropped without complaint.
#[derive(Clone)]
pub struct CollisionHandler {
    address_map: Arc<AddressMap>,
    state: Arc<SuitState>,
}

impl CollisionHandler {
    pub fn new(address_map: Arc<AddressMap>, state: Arc<SuitState>) -> Self {
        Self { address_map, state }
    }

    pub fn on_collision(&self, address: &str, args: &[OscType]) {
        let Some(muscle) = self.address_map.muscle_for(address) else {
            return;
        };
        let was_entered = match args {
            [OscType::Bool(b)] => *b,
            _ => {
                trace!("Ignoring {address} with args {:?}", args);
                return;
            }
        };
        if was_entered {
            self.state.enter(muscle);
        } else {
            self.state.exit(muscle);
        }
    }
}

impl OscHandler for CollisionHandler {
    fn handle_message(&self, address: &str, args: &[OscType]) {
        self.on_collision(address, args);
    }
}
