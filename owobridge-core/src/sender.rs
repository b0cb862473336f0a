//! src/sender.rs
//!
//! The periodic loop that turns the active muscle set into haptic pulses.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::address_map::AddressMap;
use crate::config::AppConfig;
use crate::eventbus::EventBus;
use crate::models::Sensation;
use crate::models::sensation::SENSATION_DURATION_SECS;
use crate::state::SuitState;
use crate::suit::SuitBackend;

pub struct SenderLoop {
    backend: Arc<dyn SuitBackend>,
    state: Arc<SuitState>,
    address_map: Arc<AddressMap>,
    config: Arc<AppConfig>,
    event_bus: Arc<EventBus>,
    period: Duration,
}

impl SenderLoop {
    pub fn new(
        backend: Arc<dyn SuitBackend>,
        state: Arc<SuitState>,
        address_map: Arc<AddressMap>,
        config: Arc<AppConfig>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let period = config.send_interval();
        Self {
            backend,
            state,
            address_map,
            config,
            event_bus,
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn create_sensation(&self, parameter: &str) -> Sensation {
        Sensation::new(
            self.config.frequency(),
            SENSATION_DURATION_SECS,
            self.config.intensity_for(parameter),
        )
    }

    /// One pass over a snapshot of the active set. Returns how many sends
    /// the backend accepted. Nothing happens, GUI notifications included,
    /// until the suit has connected once.
    pub async fn tick(&self) -> usize {
        let active = self.state.snapshot();
        let mut sent = 0;

        if !self.state.has_connected() {
            return sent;
        }

        if !active.is_empty() && !self.state.is_paused() {
            for muscle in &active {
                let Some(parameter) = self.address_map.address_for(*muscle) else {
                    continue;
                };
                self.event_bus.publish_muscle_update(parameter).await;

                let sensation = self.create_sensation(parameter);
                debug!("OWO#Send({:?}, {muscle}) begin", sensation);
                match self.backend.send(&sensation, *muscle).await {
                    Ok(()) => sent += 1,
                    Err(e) => warn!("Send to {muscle} failed: {e}"),
                }
                debug!("OWO#Send end");
            }
        }

        if active.is_empty() {
            self.event_bus.publish_muscle_reset().await;
        }
        sent
    }

    /// Tick every `period` until the event bus is shut down.
    pub async fn run(&self) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown_rx = self.event_bus.shutdown_rx.clone();

        info!("Sender loop running every {:?}", self.period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Sender loop stopping.");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Muscle, SuitEvent};
    use crate::suit::MockSuitBackend;

    fn sender(mock: MockSuitBackend, state: Arc<SuitState>) -> (SenderLoop, Arc<EventBus>) {
        let bus = Arc::new(EventBus::new());
        let s = SenderLoop::new(
            Arc::new(mock),
            state,
            Arc::new(AddressMap::default()),
            Arc::new(AppConfig::default()),
            bus.clone(),
        );
        (s, bus)
    }

    #[tokio::test]
    async fn paused_sends_nothing() {
        let mut mock = MockSuitBackend::new();
        mock.expect_send().times(0);

        let state = Arc::new(SuitState::new());
        state.mark_connected();
        state.enter(Muscle::ArmL);
        state.enter(Muscle::ArmR);
        state.toggle_paused();

        let (s, _bus) = sender(mock, state);
        assert_eq!(s.tick().await, 0);
    }

    #[tokio::test]
    async fn never_connected_sends_nothing() {
        let mut mock = MockSuitBackend::new();
        mock.expect_send().times(0);

        let state = Arc::new(SuitState::new());
        state.enter(Muscle::ArmL);

        let (s, _bus) = sender(mock, state);
        assert_eq!(s.tick().await, 0);
    }

    #[tokio::test]
    async fn one_send_and_update_per_active_muscle() {
        let mut mock = MockSuitBackend::new();
        mock.expect_send()
            .withf(|sensation: &Sensation, muscle: &Muscle| {
                sensation.frequency == 50
                    && sensation.intensity == 10.0
                    && matches!(muscle, Muscle::ArmL | Muscle::LumbarR)
            })
            .times(2)
            .returning(|_, _| Ok(()));

        let state = Arc::new(SuitState::new());
        state.mark_connected();
        state.enter(Muscle::LumbarR);
        state.enter(Muscle::ArmL);

        let (s, bus) = sender(mock, state);
        let mut rx = bus.subscribe(None).await;
        assert_eq!(s.tick().await, 2);

        assert_eq!(
            rx.recv().await,
            Some(SuitEvent::ActiveMuscleUpdate { parameter: "/avatar/parameters/owo_suit_Arm_L".into() })
        );
        assert_eq!(
            rx.recv().await,
            Some(SuitEvent::ActiveMuscleUpdate { parameter: "/avatar/parameters/owo_suit_Lumbar_R".into() })
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn empty_set_publishes_reset_even_when_paused() {
        let mut mock = MockSuitBackend::new();
        mock.expect_send().times(0);

        let state = Arc::new(SuitState::new());
        state.mark_connected();
        state.toggle_paused();

        let (s, bus) = sender(mock, state);
        let mut rx = bus.subscribe(None).await;
        s.tick().await;
        assert_eq!(rx.recv().await, Some(SuitEvent::ActiveMuscleReset));
    }

    #[tokio::test]
    async fn never_connected_publishes_nothing() {
        let mut mock = MockSuitBackend::new();
        mock.expect_send().times(0);

        let (s, bus) = sender(mock, Arc::new(SuitState::new()));
        let mut rx = bus.subscribe(None).await;
        assert_eq!(s.tick().await, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_send_does_not_stop_the_tick() {
        let mut mock = MockSuitBackend::new();
        mock.expect_send()
            .withf(|_, muscle: &Muscle| *muscle == Muscle::PectoralR)
            .returning(|_, _| Err(crate::Error::Suit("dropped".into())));
        mock.expect_send()
            .withf(|_, muscle: &Muscle| *muscle == Muscle::PectoralL)
            .returning(|_, _| Ok(()));

        let state = Arc::new(SuitState::new());
        state.mark_connected();
        state.enter(Muscle::PectoralR);
        state.enter(Muscle::PectoralL);

        let (s, _bus) = sender(mock, state);
        assert_eq!(s.tick().await, 1);
    }
}
