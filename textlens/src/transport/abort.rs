use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Cancels the operation an orchestrator is running.
///
/// Cheap to clone and safe to fire from another task, e.g. a Ctrl-C handler.
/// Every clone shares one token cell, so a handle taken at any point reaches
/// whichever operation is in flight when it fires. Firing a handle when
/// nothing is in flight has no effect on later operations.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    token: Arc<Mutex<CancellationToken>>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.current().cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.current().is_cancelled()
    }

    pub(crate) async fn aborted(&self) {
        let token = self.current();
        token.cancelled().await
    }

    fn current(&self) -> CancellationToken {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn rearm(&self) {
        let mut token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        if token.is_cancelled() {
            *token = CancellationToken::new();
        }
    }
}

/// Fires `handle` on Ctrl-C. Abort the returned task once the operation is over.
pub fn abort_on_ctrl_c(handle: AbortHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(target: "user", "Cancelling, waiting for the request to stop");
            handle.abort();
        }
    })
}

/// The abort handle an orchestrator hands out. Each operation arms it, which
/// swaps out a token that already fired.
#[derive(Debug, Default)]
pub(crate) struct AbortSlot {
    current: AbortHandle,
}

impl AbortSlot {
    pub(crate) fn handle(&self) -> AbortHandle {
        self.current.clone()
    }

    pub(crate) fn arm(&self) -> AbortHandle {
        self.current.rearm();
        self.current.clone()
    }
}

/// Holds an orchestrator's state while an operation is in flight. If the
/// operation's future is dropped before [`InFlight::settle`] is called, the
/// state is replaced with the `abandoned` value.
pub(crate) struct InFlight<'a, S> {
    slot: &'a mut S,
    abandoned: Option<S>,
}

impl<'a, S> InFlight<'a, S> {
    pub(crate) fn start(slot: &'a mut S, running: S, abandoned: S) -> Self {
        *slot = running;
        Self {
            slot,
            abandoned: Some(abandoned),
        }
    }

    pub(crate) fn settle(mut self, state: S) {
        self.abandoned = None;
        *self.slot = state;
    }
}

impl<S> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if let Some(abandoned) = self.abandoned.take() {
            *self.slot = abandoned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_taken_before_arming_still_aborts() {
        let slot = AbortSlot::default();
        let handle = slot.handle();
        let armed = slot.arm();

        handle.abort();
        assert!(armed.is_aborted());
    }

    #[test]
    fn test_fired_token_is_replaced_on_arm() {
        let slot = AbortSlot::default();
        slot.handle().abort();

        let armed = slot.arm();
        assert!(!armed.is_aborted());
    }

    #[test]
    fn test_handle_taken_after_abort_reaches_next_operation() {
        let slot = AbortSlot::default();
        slot.arm();
        slot.handle().abort();

        let between_runs = slot.handle();
        let armed = slot.arm();
        assert!(!armed.is_aborted());

        between_runs.abort();
        assert!(armed.is_aborted());
    }

    #[test]
    fn test_in_flight_settles_to_given_state() {
        let mut state = "idle";
        let in_flight = InFlight::start(&mut state, "running", "abandoned");
        in_flight.settle("done");
        assert_eq!("done", state);
    }

    #[test]
    fn test_dropped_in_flight_marks_abandoned() {
        let mut state = "idle";
        {
            let _in_flight = InFlight::start(&mut state, "running", "abandoned");
        }
        assert_eq!("abandoned", state);
    }
}
