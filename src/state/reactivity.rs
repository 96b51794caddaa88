// ============================================================================
// REACTIVITY - Subscriber/notification mechanism for state changes
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Reactive value with change notifications. Clones share both the value and
/// the subscriber list, so a mutation through any handle is visible to every
/// consumer on the next notification.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<(u64, Callback)>>>,
    next_id: Rc<Cell<u64>>,
}

impl<T> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    /// Read the current value through a closure
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Update the value in place and notify subscribers
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut *self.value.borrow_mut());
        self.notify();
    }

    /// Subscribe to changes; the returned id can be passed to `unsubscribe`
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn() + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Deterministic teardown for consumers that go away
    pub fn unsubscribe(&self, id: u64) {
        self.subscribers.borrow_mut().retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&self) {
        // Snapshot first: a callback may subscribe/unsubscribe re-entrantly
        let callbacks: Vec<Callback> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl<T: Clone> ReactiveState<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_notifies_subscribers() {
        let state = ReactiveState::new(0u32);
        let seen = Rc::new(Cell::new(0u32));
        let seen_clone = seen.clone();
        let value = state.clone();
        state.subscribe(move || seen_clone.set(value.get()));

        state.set(7);
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn unsubscribed_callback_is_not_called() {
        let state = ReactiveState::new(0u32);
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = calls.clone();
        let id = state.subscribe(move || calls_clone.set(calls_clone.get() + 1));

        state.set(1);
        state.unsubscribe(id);
        state.set(2);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn clones_share_value_and_subscribers() {
        let state = ReactiveState::new(String::new());
        let other = state.clone();
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = calls.clone();
        other.subscribe(move || calls_clone.set(calls_clone.get() + 1));

        state.set("hello".to_string());
        assert_eq!(other.get(), "hello");
        assert_eq!(calls.get(), 1);
    }
}
