//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a value and
//! the list of observers that want to hear about changes to it.
//!
//! # How Signals Work
//!
//! 1. Observers register explicitly with [`Signal::subscribe`] or
//!    [`Signal::observe`]. There is no implicit dependency tracking.
//!
//! 2. Every [`Signal::set`], [`Signal::update`] or [`Signal::modify`]
//!    notifies all observers synchronously, in registration order, with the
//!    new value.
//!
//! 3. A write made while a notification pass is running (by an observer or
//!    by another thread) does not nest a second pass. It marks the signal
//!    pending, and the running pass repeats with the latest value once every
//!    observer has seen the current one. Repeats are capped at
//!    [`MAX_NOTIFY_PASSES`] so an observer that always writes cannot loop.
//!
//! # Thread Safety
//!
//! Signals are `Send + Sync`. The value and the observer list sit behind
//! `parking_lot` locks, and no lock is held while observers run, so an
//! observer may freely read, write, subscribe or unsubscribe. Notification
//! ordering is only defined for a single writer.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::subscriber::{SubscriberId, Subscription};

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Passes one write may trigger before re-broadcasts stop.
pub const MAX_NOTIFY_PASSES: usize = 100;

type Notifier<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Most signals have one or two observers.
type Notifiers<T> = SmallVec<[(SubscriberId, Notifier<T>); 2]>;

/// A reactive signal holding a value of type T.
///
/// Cloning a signal produces another handle to the same value and the same
/// observer list.
///
/// # Example
///
/// ```rust
/// use trellis_core::reactive::Signal;
///
/// let count = Signal::new(0);
/// let _subscription = count.observe(|value| println!("count is now {value}"));
///
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Unique identifier for this signal.
    id: u64,

    /// The current value.
    value: Arc<RwLock<T>>,

    /// Notification callbacks, in registration order.
    notifiers: Arc<RwLock<Notifiers<T>>>,

    /// Set while a notification pass is running.
    notifying: Arc<AtomicBool>,

    /// Set by a write that the running pass has not broadcast yet.
    pending: Arc<AtomicBool>,
}

impl<T> Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_signal_id(),
            value: Arc::new(RwLock::new(value)),
            notifiers: Arc::new(RwLock::new(SmallVec::new())),
            notifying: Arc::new(AtomicBool::new(false)),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// The closure must not write this signal.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.value.read();
        f(&guard)
    }

    /// Set a new value and notify subscribers.
    pub fn set(&self, value: T) {
        *self.value.write() = value;
        self.notify_subscribers();
    }

    /// Replace the value with one computed from the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.value.read();
            f(&guard)
        };
        self.set(new_value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut guard = self.value.write();
            f(&mut guard);
        }
        self.notify_subscribers();
    }

    /// Register a notification callback for a subscriber.
    ///
    /// The callback will be invoked with the new value whenever it changes.
    pub fn subscribe<F>(&self, subscriber_id: SubscriberId, notify: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.notifiers
            .write()
            .push((subscriber_id, Arc::new(notify)));
    }

    /// Register a callback under a fresh ID and return a handle that
    /// unsubscribes it when dropped.
    ///
    /// The handle only keeps a weak reference to the signal.
    pub fn observe<F>(&self, notify: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let subscriber_id = SubscriberId::new();
        self.subscribe(subscriber_id, notify);

        let notifiers = Arc::downgrade(&self.notifiers);
        Subscription::new(subscriber_id, move || {
            if let Some(notifiers) = notifiers.upgrade() {
                notifiers.write().retain(|(id, _)| *id != subscriber_id);
            }
        })
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.notifiers
            .write()
            .retain(|(id, _)| *id != subscriber_id);
    }

    /// Notify all subscribers that the value has changed.
    fn notify_subscribers(&self) {
        self.pending.store(true, Ordering::SeqCst);
        let mut passes = 0;

        // Re-checked after the pass mark is released, in case another thread
        // wrote between the last pass and the release.
        while self.pending.load(Ordering::SeqCst) {
            let Some(_pass) = NotifyPass::begin(&self.notifying) else {
                debug!(signal = self.id, "write during notification queued for the running pass");
                return;
            };

            while self.pending.swap(false, Ordering::SeqCst) {
                if passes == MAX_NOTIFY_PASSES {
                    warn!(
                        signal = self.id,
                        passes, "observers kept writing; stopped re-broadcasting"
                    );
                    return;
                }
                passes += 1;

                // Snapshot both so observers can touch this signal without deadlocking.
                let notifiers: Notifiers<T> = self.notifiers.read().clone();
                let value = self.get();

                for (subscriber_id, notify) in notifiers.iter() {
                    trace!(signal = self.id, subscriber = subscriber_id.raw(), pass = passes, "notify");
                    notify(&value);
                }
            }
        }
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.notifiers.read().len()
    }
}

/// Marks a notification pass as running; clears the mark on drop so a
/// panicking observer does not leave the signal muted.
struct NotifyPass<'a> {
    flag: &'a AtomicBool,
}

impl<'a> NotifyPass<'a> {
    fn begin(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for NotifyPass<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl<T> Clone for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            notifiers: Arc::clone(&self.notifiers),
            notifying: Arc::clone(&self.notifying),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T> Default for Signal<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Debug for Signal<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &*self.value.read())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;
    use parking_lot::Mutex;

    #[test]
    fn signal_get_and_set() {
        let signal = Signal::new(0);
        assert_eq!(signal.get(), 0);

        signal.set(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn signal_update_and_modify() {
        let signal = Signal::new(vec![1, 2]);
        signal.update(|v| v.iter().map(|x| x * 10).collect());
        assert_eq!(signal.get(), vec![10, 20]);

        signal.modify(|v| v.push(30));
        assert_eq!(signal.with(|v| v.len()), 3);
    }

    #[test]
    fn signal_notifies_subscribers_with_new_value() {
        let signal = Signal::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        signal.subscribe(SubscriberId::new(), move |value| {
            seen_clone.lock().push(*value);
        });

        signal.set(1);
        signal.update(|v| v + 1);
        signal.modify(|v| *v *= 10);

        assert_eq!(*seen.lock(), vec![1, 2, 20]);
    }

    #[test]
    fn subscribers_run_in_registration_order() {
        let signal = Signal::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            signal.subscribe(SubscriberId::new(), move |_| order.lock().push(tag));
        }

        signal.set(1);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn signal_unsubscribe() {
        let signal = Signal::new(0);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let subscriber_id = SubscriberId::new();
        signal.subscribe(subscriber_id, move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.set(1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        signal.unsubscribe(subscriber_id);
        signal.set(2);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let signal = Signal::new(0);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let subscription = signal.observe(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(signal.subscriber_count(), 1);

        signal.set(1);
        drop(subscription);
        signal.set(2);

        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn self_writing_subscriber_is_capped() {
        let signal = Signal::new(0);
        let call_count = Arc::new(AtomicI32::new(0));

        let handle = signal.clone();
        let call_count_clone = call_count.clone();
        signal.subscribe(SubscriberId::new(), move |value| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            handle.set(value + 1);
        });

        signal.set(10);

        // Every pass writes again, so notification stops at the cap. The
        // last write still lands.
        let cap = MAX_NOTIFY_PASSES as i32;
        assert_eq!(call_count.load(Ordering::SeqCst), cap);
        assert_eq!(signal.get(), 10 + cap);

        // The signal is not left muted afterwards.
        signal.set(0);
        assert_eq!(call_count.load(Ordering::SeqCst), 2 * cap);
    }

    #[test]
    fn nested_write_reaches_every_subscriber() {
        let signal = Signal::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handle = signal.clone();
        signal.subscribe(SubscriberId::new(), move |value| {
            if *value > 5 {
                handle.set(5);
            }
        });
        let seen_clone = seen.clone();
        signal.subscribe(SubscriberId::new(), move |value| {
            seen_clone.lock().push(*value);
        });

        signal.set(9);

        // The second subscriber sees the original write, then the clamp.
        assert_eq!(signal.get(), 5);
        assert_eq!(*seen.lock(), vec![9, 5]);

        signal.set(3);
        assert_eq!(*seen.lock(), vec![9, 5, 3]);
    }

    #[test]
    fn subscriber_may_subscribe_during_notification() {
        let signal = Signal::new(0);
        let handle = signal.clone();

        let _subscription = signal.observe(move |_| {
            handle.subscribe(SubscriberId::new(), |_| {});
        });

        signal.set(1);
        assert_eq!(signal.subscriber_count(), 2);
    }

    #[test]
    fn signal_clone_shares_state() {
        let signal1 = Signal::new(0);
        let signal2 = signal1.clone();

        signal1.set(42);
        assert_eq!(signal2.get(), 42);
        assert_eq!(signal1.id(), signal2.id());
    }

    #[test]
    fn signal_ids_are_unique() {
        let s1 = Signal::new(0);
        let s2 = Signal::new(0);

        assert_ne!(s1.id(), s2.id());
    }
}
