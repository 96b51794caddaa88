use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Trailing-edge debouncer. Each `schedule` call replaces the pending timer;
/// only the action from the most recent call runs once the delay elapses.
#[derive(Clone)]
pub struct Debouncer {
    delay_ms: u32,
    generation: Rc<Cell<u64>>,
    timer: Rc<RefCell<Option<Timeout>>>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            generation: Rc::new(Cell::new(0)),
            timer: Rc::new(RefCell::new(None)),
        }
    }

    /// Run `action` after the delay, unless another call supersedes it first
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + 'static,
    {
        let gen = self.bump();
        let generation = self.generation.clone();
        let timeout = Timeout::new(self.delay_ms, move || {
            // A later schedule() invalidates this generation
            if generation.get() == gen {
                action();
            }
        });
        if let Some(previous) = self.timer.borrow_mut().replace(timeout) {
            previous.cancel();
        }
    }

    fn bump(&self) -> u64 {
        let gen = self.generation.get() + 1;
        self.generation.set(gen);
        gen
    }

    #[cfg(test)]
    fn is_current(&self, gen: u64) -> bool {
        self.generation.get() == gen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_schedules_supersede_earlier_generations() {
        let debouncer = Debouncer::new(500);
        let first = debouncer.bump();
        let second = debouncer.bump();
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }
}
