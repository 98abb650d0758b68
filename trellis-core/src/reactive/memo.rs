//! Memo Implementation
//!
//! A Memo is a cached derived value that re-evaluates only when one of its
//! dependencies changes.
//!
//! # How Memos Work
//!
//! 1. Dependencies are declared up front: [`Memo::derived`] reads one
//!    signal, and [`Memo::depend_on`] adds more.
//!
//! 2. When a dependency changes, the memo is marked dirty. Nothing is
//!    recomputed yet.
//!
//! 3. On the next [`Memo::get`], a dirty memo recomputes and caches the
//!    result. A clean memo returns its cache.
//!
//! Memos that are never read stay dirty, so a derived flag nobody renders
//! costs nothing.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::signal::Signal;
use super::subscriber::Subscription;

/// Counter for generating unique memo IDs.
static MEMO_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_memo_id() -> u64 {
    MEMO_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Dirty state for a memo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoState {
    /// The cached value is up-to-date.
    Clean,

    /// A dependency changed since the last computation.
    Dirty,
}

/// A cached derived value that recomputes only when dependencies change.
pub struct Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    id: u64,

    compute: Arc<dyn Fn() -> T + Send + Sync>,

    /// The cached value (None if never computed).
    value: Arc<RwLock<Option<T>>>,

    state: Arc<RwLock<MemoState>>,

    /// Live subscriptions to the signals this memo reads.
    /// Dropped (and so unsubscribed) with the last clone of the memo.
    dependencies: Arc<Mutex<Vec<Subscription>>>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a memo with no dependencies.
    ///
    /// The computation is not run immediately. It runs on first access, and
    /// again after every [`mark_dirty`](Self::mark_dirty).
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            id: next_memo_id(),
            compute: Arc::new(compute),
            value: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(MemoState::Dirty)),
            dependencies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a memo computed from the value of `source`.
    ///
    /// ```rust
    /// use trellis_core::reactive::{Memo, Signal};
    ///
    /// let items = Signal::new(vec![1, 2, 3]);
    /// let total = Memo::derived(&items, |items| items.iter().sum::<i32>());
    ///
    /// assert_eq!(total.get(), 6);
    /// items.modify(|items| items.push(4));
    /// assert_eq!(total.get(), 10);
    /// ```
    pub fn derived<S, F>(source: &Signal<S>, compute: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let reader = source.clone();
        let memo = Self::new(move || reader.with(|value| compute(value)));
        memo.depend_on(source);
        memo
    }

    /// Mark this memo dirty whenever `signal` changes.
    pub fn depend_on<S>(&self, signal: &Signal<S>)
    where
        S: Clone + Send + Sync + 'static,
    {
        let state = Arc::clone(&self.state);
        let subscription = signal.observe(move |_| {
            *state.write() = MemoState::Dirty;
        });
        self.dependencies.lock().push(subscription);
    }

    /// Get the memo's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value, recomputing if necessary.
    pub fn get(&self) -> T {
        if self.state() == MemoState::Clean {
            if let Some(value) = self.value.read().clone() {
                return value;
            }
        }
        self.recompute()
    }

    /// Mark the memo as needing recomputation.
    pub fn mark_dirty(&self) {
        *self.state.write() = MemoState::Dirty;
    }

    fn recompute(&self) -> T {
        let new_value = (self.compute)();
        *self.value.write() = Some(new_value.clone());
        *self.state.write() = MemoState::Clean;
        new_value
    }

    /// Get the current dirty state.
    pub fn state(&self) -> MemoState {
        *self.state.read()
    }

    /// Number of signals this memo depends on.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.lock().len()
    }

    /// Check if the memo has a cached value.
    pub fn has_value(&self) -> bool {
        self.value.read().is_some()
    }
}

impl<T> Clone for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            compute: Arc::clone(&self.compute),
            value: Arc::clone(&self.value),
            state: Arc::clone(&self.state),
            dependencies: Arc::clone(&self.dependencies),
        }
    }
}

impl<T> Debug for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("has_value", &self.has_value())
            .field("dependency_count", &self.dependency_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
