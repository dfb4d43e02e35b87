use std::cell::RefCell;

/// Trailing-edge coalescing: of all calls made within one window only the last
/// one runs, with its own arguments.
///
/// Holds the one pending timer; arming a new timer drops the previous, and
/// dropping a timer handle (such as `gloo_timers::callback::Timeout`) cancels it.
pub struct Debouncer<H> {
    pending: RefCell<Option<H>>,
}

impl<H> Default for Debouncer<H> {
    fn default() -> Self {
        Self {
            pending: RefCell::new(None),
        }
    }
}

impl<H> Debouncer<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self, timer: H) {
        let previous = self.pending.replace(Some(timer));
        drop(previous);
    }

    pub fn cancel(&self) {
        let previous = self.pending.take();
        drop(previous);
    }

    pub fn is_armed(&self) -> bool {
        self.pending.borrow().is_some()
    }
}
