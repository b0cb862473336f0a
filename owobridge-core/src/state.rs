//! src/state.rs
//!
//! `SuitState` is the single owner of everything the OSC side, the sender and
//! the connection manager share: the active muscle set and three flags.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::Muscle;

#[derive(Debug, Default)]
pub struct SuitState {
    active_muscles: Mutex<HashSet<Muscle>>,
    paused: AtomicBool,
    connecting: AtomicBool,
    has_connected: AtomicBool,
}

impl SuitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the muscle was not active before.
    pub fn enter(&self, muscle: Muscle) -> bool {
        self.with_set(|set| set.insert(muscle))
    }

    /// Removing a muscle that is not active is a no-op.
    pub fn exit(&self, muscle: Muscle) -> bool {
        self.with_set(|set| set.remove(&muscle))
    }

    pub fn is_active(&self, muscle: Muscle) -> bool {
        self.with_set(|set| set.contains(&muscle))
    }

    /// Copy of the active set, in vendor order. Iterate this, never the set itself.
    pub fn snapshot(&self) -> Vec<Muscle> {
        let mut muscles: Vec<Muscle> = self.with_set(|set| set.iter().copied().collect());
        muscles.sort();
        muscles
    }

    pub fn active_count(&self) -> usize {
        self.with_set(|set| set.len())
    }

    pub fn clear(&self) {
        self.with_set(|set| set.clear())
    }

    fn with_set<R>(&self, f: impl FnOnce(&mut HashSet<Muscle>) -> R) -> R {
        let mut guard = self
            .active_muscles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Flip the pause flag and return the new value.
    pub fn toggle_paused(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Claim the connecting flag. False if someone else already holds it.
    pub fn begin_connecting(&self) -> bool {
        self.connecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn finish_connecting(&self) {
        self.connecting.store(false, Ordering::SeqCst);
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::SeqCst)
    }

    pub fn mark_connected(&self) {
        self.has_connected.store(true, Ordering::SeqCst);
    }

    pub fn has_connected(&self) -> bool {
        self.has_connected.load(Ordering::SeqCst)
    }
}
