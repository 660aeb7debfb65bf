//! Scoped timers.
//!
//! Every delayed action in a stage goes through a [`TimerSlot`]: arming a slot
//! cancels whatever it held, and the slot is cleared when the owning
//! component unmounts, so a stage switch never leaves a timer behind.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;

#[derive(Clone, Default)]
pub struct TimerSlot {
    task: Rc<RefCell<Option<Task>>>,
}

impl TimerSlot {
    /// Run `action` after `delay`, replacing any pending action.
    pub fn arm(&self, delay: Duration, action: impl FnOnce() + 'static) {
        self.cancel();
        let slot = Rc::clone(&self.task);
        let task = spawn(async move {
            tokio::time::sleep(delay).await;
            slot.borrow_mut().take();
            action();
        });
        *self.task.borrow_mut() = Some(task);
    }

    pub fn cancel(&self) {
        if let Some(task) = self.task.borrow_mut().take() {
            task.cancel();
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.task.borrow().is_some()
    }
}

/// A timer slot owned by the calling component.
pub fn use_timer_slot() -> TimerSlot {
    let slot = use_hook(TimerSlot::default);
    let on_drop = slot.clone();
    use_drop(move || on_drop.cancel());
    slot
}
