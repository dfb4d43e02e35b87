use std::cell::RefCell;

/// Last fragment seen by the hash poller.
#[derive(Debug, Default)]
pub struct HashWatcher {
    last: RefCell<String>,
}

impl HashWatcher {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            last: RefCell::new(initial.into()),
        }
    }

    /// Records `current` and reports whether it differs from the last value seen.
    pub fn observe(&self, current: &str) -> bool {
        let mut last = self.last.borrow_mut();
        if *last == current {
            return false;
        }
        *last = current.to_string();
        true
    }

    /// Marks a fragment written by the widget itself as already seen.
    pub fn remember(&self, hash: impl Into<String>) {
        *self.last.borrow_mut() = hash.into();
    }
}
