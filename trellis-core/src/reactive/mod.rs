//! Reactive Primitives
//!
//! This module implements the small reactive layer the component state is
//! built on: signals, watches and memos.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a shared container for mutable state. Every write notifies
//! the signal's observers synchronously, in registration order.
//!
//! ## Watches
//!
//! A Watch binds a side-effecting callback to one signal. It replaces the
//! framework watcher: source data changing resets the working rows, the
//! selection vector changing recomputes the aggregate flags, and so on.
//!
//! ## Memos
//!
//! A Memo is a derived value that caches its result and recomputes lazily
//! after one of its declared dependencies changes.
//!
//! # Implementation Notes
//!
//! Dependencies are always registered explicitly. There is no thread-local
//! "current computation" and no global runtime; a component owns the
//! watches it registers and tears them down with itself.

mod memo;
mod signal;
mod subscriber;
mod watch;

pub use memo::{Memo, MemoState};
pub use signal::{Signal, MAX_NOTIFY_PASSES};
pub use subscriber::{SubscriberId, Subscription};
pub use watch::{Watch, WatchOptions};
