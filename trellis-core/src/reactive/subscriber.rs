//! Subscriber identity and subscription handles.
//!
//! Every observer of a signal (a watch, a memo, or a host callback) is
//! registered under a [`SubscriberId`]. Registering through
//! [`Signal::observe`](super::Signal::observe) hands back a [`Subscription`],
//! which detaches the observer when cancelled or dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Unique identifier for a subscriber.
///
/// Each observer gets a unique ID when created. The ID is the key used to
/// unsubscribe, so the same callback can never be removed by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

type Cancel = Box<dyn FnOnce() + Send>;

/// Handle to a live subscription.
///
/// Dropping the handle unsubscribes the observer from its signal.
pub struct Subscription {
    id: SubscriberId,
    cancel: Mutex<Option<Cancel>>,
}

impl Subscription {
    /// Wrap a cancel action for the subscriber `id`.
    pub(crate) fn new<F>(id: SubscriberId, cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id,
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// The subscriber this handle belongs to.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Detach the observer. Calling this more than once is a no-op.
    pub fn cancel(&self) {
        let cancel = self.cancel.lock().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    /// Whether [`cancel`](Self::cancel) has already run.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.lock().is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
