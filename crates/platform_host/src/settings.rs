//! Observable setting contracts and the in-memory preference cell.
//!
//! Every user-configurable value crosses into the runtime as a [`Setting`]: a readable cell plus a
//! stream of change notifications delivered on the UI thread. Host notifications are not
//! guaranteed to be deduplicated, so consumers must filter repeated values themselves.

use std::{cell::RefCell, fmt, rc::Rc};

use futures::{
    channel::mpsc::{self, UnboundedSender},
    stream::LocalBoxStream,
    StreamExt,
};

/// Boxed local stream of values published by a [`Setting`].
pub type SettingChanges<T> = LocalBoxStream<'static, T>;

/// Host contract for one named, observable, user-configurable value.
pub trait Setting<T> {
    /// Stable storage key used for diagnostics and binding identity.
    fn key(&self) -> &'static str;

    /// Reads the current value.
    fn get(&self) -> T;

    /// Subscribes to future notifications.
    ///
    /// The stream yields every notification the host emits after subscription, including
    /// spurious repeats of an unchanged value. Dropping the stream cancels the subscription.
    fn changes(&self) -> SettingChanges<T>;
}

struct PreferenceInner<T> {
    key: &'static str,
    value: RefCell<T>,
    subscribers: RefCell<Vec<UnboundedSender<T>>>,
}

/// In-memory observable preference cell.
///
/// Clones share the same underlying value and subscriber list, which mirrors how a host settings
/// layer hands the same preference object to several consumers.
pub struct Preference<T> {
    inner: Rc<PreferenceInner<T>>,
}

impl<T> Clone for Preference<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Preference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preference")
            .field("key", &self.inner.key)
            .field("value", &*self.inner.value.borrow())
            .finish()
    }
}

impl<T: Clone + 'static> Preference<T> {
    /// Creates a preference holding `initial`.
    pub fn new(key: &'static str, initial: T) -> Self {
        Self {
            inner: Rc::new(PreferenceInner {
                key,
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Stores `value` and notifies every live subscriber.
    ///
    /// Notifications are sent even when `value` equals the stored value.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value.clone();
        self.publish(value);
    }

    /// Re-emits the current value without changing it.
    pub fn notify_current(&self) {
        let current = self.inner.value.borrow().clone();
        self.publish(current);
    }

    /// Returns the number of subscriptions that have not been dropped yet.
    ///
    /// Dropped subscriptions are only observed on the next notification, so this count may lag
    /// behind by one publish.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|sender| !sender.is_closed())
            .count()
    }

    fn publish(&self, value: T) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|sender| sender.unbounded_send(value.clone()).is_ok());
    }
}

impl<T: Clone + 'static> Setting<T> for Preference<T> {
    fn key(&self) -> &'static str {
        self.inner.key
    }

    fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    fn changes(&self) -> SettingChanges<T> {
        let (sender, receiver) = mpsc::unbounded();
        self.inner.subscribers.borrow_mut().push(sender);
        receiver.boxed_local()
    }
}
