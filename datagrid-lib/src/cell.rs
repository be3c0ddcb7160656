//! Reactive cells
//!
//! A [`Cell`] holds a shared value and tells its observers when it changes.
//! Synchronous listeners run on the caller's thread right after the change,
//! async observers use a tokio watch receiver.

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use tokio::sync::watch;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Listener<T>)>>,
}

/// Reactive value with interior mutability.
///
/// `Cell<T>` is cheap to clone: all clones share the same value and the same
/// set of observers, so a caller can keep one handle and give another to a
/// [`ListViewStore`](crate::ListViewStore).
///
/// # Example
///
/// ```
/// use datagrid_lib::Cell;
///
/// let page = Cell::new(None::<u32>);
/// let subscription = page.subscribe(|value| println!("page is now {value:?}"));
///
/// assert!(page.set(Some(1)));
/// assert!(!page.set(Some(1))); // unchanged, nobody is notified
///
/// subscription.unsubscribe();
/// ```
pub struct Cell<T> {
    tx: Arc<watch::Sender<T>>,
    listeners: Arc<Listeners<T>>,
}

impl<T> Cell<T> {
    /// Create a new cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(value)),
            listeners: Arc::new(Listeners {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    ///
    /// The cell is read-locked while `f` runs; do not write to it from `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the value, notifying observers if it changed.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&self, value: T) -> bool
    where
        T: Clone + PartialEq,
    {
        let changed = self.set_quiet(value);
        if changed {
            self.notify();
        }
        changed
    }

    /// Mutate the value in place and notify observers unconditionally.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
        T: Clone,
    {
        self.tx.send_modify(f);
        self.notify();
    }

    /// Mutate the value in place; `f` reports whether anything changed.
    ///
    /// Observers are only notified when `f` returns `true`.
    pub fn modify<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut T) -> bool,
        T: Clone,
    {
        let changed = self.tx.send_if_modified(f);
        if changed {
            self.notify();
        }
        changed
    }

    /// Register a synchronous listener, called after every change.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut entries) = self.listeners.entries.lock() {
            entries.push((id, Arc::new(listener)));
        }

        let listeners = Arc::downgrade(&self.listeners);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(listeners) = listeners.upgrade()
                    && let Ok(mut entries) = listeners.entries.lock()
                {
                    entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Number of registered synchronous listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// Get a watch receiver for async observers.
    pub fn watch(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Wait until the value satisfies `predicate`, returning a clone of it.
    ///
    /// Resolves immediately if the current value already matches.
    pub async fn wait_for<P>(&self, mut predicate: P) -> T
    where
        P: FnMut(&T) -> bool,
        T: Clone,
    {
        let mut rx = self.tx.subscribe();
        let matched = match rx.wait_for(|value| predicate(value)).await {
            Ok(value) => Some((*value).clone()),
            // The sender lives as long as `self`, so this is unreachable.
            Err(_) => None,
        };
        matched.unwrap_or_else(|| self.get())
    }

    /// Replace the value without running synchronous listeners.
    ///
    /// Watch receivers still see the change. Pair with [`Cell::notify`] once
    /// any surrounding lock has been released.
    pub(crate) fn set_quiet(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Run every synchronous listener against the current value.
    pub(crate) fn notify(&self)
    where
        T: Clone,
    {
        let listeners: Vec<Listener<T>> = match self.listeners.entries.lock() {
            Ok(entries) => entries.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => return,
        };
        if listeners.is_empty() {
            return;
        }

        let value = self.get();
        for listener in listeners {
            listener(&value);
        }
    }
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<T: Default> Default for Cell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("value", &*self.tx.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle for a listener registered with [`Cell::subscribe`].
///
/// Dropping the handle detaches the listener.
#[must_use = "dropping a Subscription detaches its listener immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Detach the listener.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
