//! Single-flight busy gate.

use tokio::sync::watch;

/// Whether a mutating operation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Busy,
}

/// Advisory lock allowing at most one mutating operation at a time.
///
/// Callers that fail to acquire the gate are expected to give up rather than
/// wait; nothing is queued.
pub struct BusyGate {
    tx: watch::Sender<Phase>,
}

impl BusyGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Phase::Idle);
        Self { tx }
    }

    /// Moves Idle -> Busy, or returns `None` if the gate is already held.
    ///
    /// The returned guard moves the gate back to Idle when dropped, on every
    /// exit path.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        let acquired = self.tx.send_if_modified(|phase| {
            if *phase == Phase::Idle {
                *phase = Phase::Busy;
                true
            } else {
                false
            }
        });
        acquired.then_some(BusyGuard { gate: self })
    }

    pub fn phase(&self) -> Phase {
        *self.tx.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == Phase::Busy
    }

    /// Subscribes to Idle/Busy transitions (e.g. to show "Thinking...").
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.tx.subscribe()
    }
}

impl Default for BusyGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the gate in the Busy phase until dropped.
pub struct BusyGuard<'a> {
    gate: &'a BusyGate,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.gate.tx.send_replace(Phase::Idle);
    }
}
