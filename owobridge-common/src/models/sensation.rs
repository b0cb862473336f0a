//! owobridge-common/src/models/sensation.rs

use serde::{Deserialize, Serialize};

/// How long a single collision pulse lasts, in seconds.
pub const SENSATION_DURATION_SECS: f32 = 0.3;

/// A haptic command as understood by the suit vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensation {
    pub frequency: u32,
    pub duration: f32,
    pub intensity: f32,
    pub ramp_up: f32,
    pub ramp_down: f32,
    pub exit_delay: f32,
}

impl Sensation {
    /// Flat sensation with no ramps and no exit delay.
    pub fn new(frequency: u32, duration: f32, intensity: f32) -> Self {
        Self {
            frequency,
            duration,
            intensity,
            ramp_up: 0.0,
            ramp_down: 0.0,
            exit_delay: 0.0,
        }
    }
}
