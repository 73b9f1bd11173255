use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

use crate::ClientEvent;

/// Holds a controller's `InFlight` state; dropping it returns the controller to `Idle`
/// and publishes the exit event, on both the success and the failure path.
pub(crate) struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    events: &'a broadcast::Sender<ClientEvent>,
    exit_event: Option<ClientEvent>,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn try_enter(
        flag: &'a AtomicBool,
        events: &'a broadcast::Sender<ClientEvent>,
        exit_event: ClientEvent,
    ) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self {
            flag,
            events,
            exit_event: Some(exit_event),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        if let Some(event) = self.exit_event.take() {
            let _ = self.events.send(event);
        }
    }
}
