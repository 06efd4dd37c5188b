//! Single-slot latest-value register with a wake signal.
//!
//! The producer overwrites the slot; the consumer takes whatever is
//! newest. Intermediate values written while the consumer was busy are
//! dropped, never queued.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Conflating handoff cell between the recognition and translation loops.
#[derive(Debug, Default)]
pub struct TextSlot {
    value: Mutex<Option<String>>,
    signal: Condvar,
}

impl TextSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the slot with a new value and wakes any waiting taker.
    pub fn publish(&self, text: String) {
        if let Ok(mut slot) = self.value.lock() {
            *slot = Some(text);
        }
        self.signal.notify_all();
    }

    /// Takes the current value, leaving the slot empty. Does not block.
    pub fn take(&self) -> Option<String> {
        self.value.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Waits up to `timeout` for a value, then takes it.
    ///
    /// Returns None on timeout or when woken without a value (a stop wake
    /// falls in that category); callers re-check their running flag and
    /// loop. A single wait, not a predicate loop, so `wake_all` always
    /// gets through.
    pub fn take_timeout(&self, timeout: Duration) -> Option<String> {
        let Ok(mut guard) = self.value.lock() else {
            return None;
        };
        if guard.is_some() {
            return guard.take();
        }
        let Ok((mut guard, _)) = self.signal.wait_timeout(guard, timeout) else {
            return None;
        };
        guard.take()
    }

    /// Wakes all waiters without writing a value, for shutdown.
    pub fn wake_all(&self) {
        self.signal.notify_all();
    }
}
