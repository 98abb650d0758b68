//! Watch Implementation
//!
//! A Watch runs a side-effecting callback whenever one signal changes. It
//! is the explicit replacement for a framework watcher: the observed signal
//! is named at registration instead of being discovered by tracking reads.
//!
//! # How Watches Work
//!
//! 1. [`Watch::new`] subscribes the callback to the signal. With
//!    [`WatchOptions::immediate`], the callback also runs once right away
//!    with the current value.
//!
//! 2. Every write to the signal runs the callback synchronously with the
//!    new value. Watches on the same signal run in registration order.
//!
//! 3. After [`Watch::dispose`] (or once every handle to the watch is
//!    dropped) the callback is detached and never runs again.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::signal::Signal;
use super::subscriber::{SubscriberId, Subscription};

/// Registration options for [`Watch::new`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOptions {
    /// Run the callback once at registration with the current value.
    pub immediate: bool,
}

impl WatchOptions {
    /// Options with `immediate` set.
    pub fn immediate() -> Self {
        Self { immediate: true }
    }
}

/// A callback bound to the changes of one signal.
///
/// # Example
///
/// ```rust
/// use trellis_core::reactive::{Signal, Watch, WatchOptions};
///
/// let rows = Signal::new(vec!["a", "b"]);
/// let watch = Watch::new(&rows, |rows| println!("{} rows", rows.len()), WatchOptions::immediate());
///
/// rows.set(vec!["c"]);
/// assert_eq!(watch.run_count(), 2);
/// ```
pub struct Watch {
    /// Shared with every clone; dropping the last one detaches the callback.
    subscription: Arc<Subscription>,

    disposed: Arc<AtomicBool>,

    run_count: Arc<AtomicUsize>,
}

impl Watch {
    /// Watch `signal`, running `callback` on every change.
    pub fn new<T, F>(signal: &Signal<T>, callback: F, options: WatchOptions) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let disposed = Arc::new(AtomicBool::new(false));
        let run_count = Arc::new(AtomicUsize::new(0));

        let run: Arc<dyn Fn(&T) + Send + Sync> = {
            let disposed = Arc::clone(&disposed);
            let run_count = Arc::clone(&run_count);
            Arc::new(move |value: &T| {
                if disposed.load(Ordering::SeqCst) {
                    return;
                }
                run_count.fetch_add(1, Ordering::SeqCst);
                callback(value);
            })
        };

        if options.immediate {
            let current = signal.get();
            run(&current);
        }

        let subscription = signal.observe(move |value| run(value));

        Self {
            subscription: Arc::new(subscription),
            disposed,
            run_count,
        }
    }

    /// The subscriber ID this watch is registered under.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscription.id()
    }

    /// Detach the callback. After disposal, the watch never runs again.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.subscription.cancel();
    }

    /// Check if the watch has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Get the number of times the callback has run.
    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }
}

impl Clone for Watch {
    fn clone(&self) -> Self {
        Self {
            subscription: Arc::clone(&self.subscription),
            disposed: Arc::clone(&self.disposed),
            run_count: Arc::clone(&self.run_count),
        }
    }
}

impl std::fmt::Debug for Watch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watch")
            .field("subscriber_id", &self.subscriber_id())
            .field("run_count", &self.run_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn immediate_watch_runs_on_creation() {
        let signal = Signal::new(7);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let watch = Watch::new(
            &signal,
            move |v| seen_clone.lock().push(*v),
            WatchOptions::immediate(),
        );

        assert_eq!(*seen.lock(), vec![7]);
        assert_eq!(watch.run_count(), 1);
    }

    #[test]
    fn lazy_watch_waits_for_first_change() {
        let signal = Signal::new(7);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let watch = Watch::new(
            &signal,
            move |v| seen_clone.lock().push(*v),
            WatchOptions::default(),
        );
        assert_eq!(watch.run_count(), 0);

        signal.set(8);
        signal.set(9);
        assert_eq!(*seen.lock(), vec![8, 9]);
        assert_eq!(watch.run_count(), 2);
    }

    #[test]
    fn disposed_watch_does_not_run() {
        let signal = Signal::new(0);
        let watch = Watch::new(&signal, |_| {}, WatchOptions::immediate());
        assert_eq!(watch.run_count(), 1);
        assert_eq!(signal.subscriber_count(), 1);

        watch.dispose();
        assert!(watch.is_disposed());
        assert_eq!(signal.subscriber_count(), 0);

        signal.set(1);
        assert_eq!(watch.run_count(), 1);
    }

    #[test]
    fn watch_lives_while_a_handle_exists() {
        let signal = Signal::new(0);
        let watch = Watch::new(&signal, |_| {}, WatchOptions::default());
        let clone = watch.clone();

        drop(watch);
        signal.set(1);
        assert_eq!(clone.run_count(), 1);

        drop(clone);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn watch_clone_shares_state() {
        let signal = Signal::new(0);
        let watch1 = Watch::new(&signal, |_| {}, WatchOptions::default());
        let watch2 = watch1.clone();

        assert_eq!(watch1.subscriber_id(), watch2.subscriber_id());

        signal.set(1);
        assert_eq!(watch2.run_count(), 1);

        watch1.dispose();
        assert!(watch2.is_disposed());
    }
}
