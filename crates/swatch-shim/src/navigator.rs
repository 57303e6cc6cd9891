//! Network connectivity flag.

use std::cell::Cell;

/// Simulated `navigator.onLine`. Online unless a test says otherwise.
#[derive(Debug)]
pub struct Navigator {
    online: Cell<bool>,
}

impl Navigator {
    /// Creates an online navigator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            online: Cell::new(true),
        }
    }

    /// Returns the current connectivity status.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.get()
    }

    /// Overrides the connectivity status.
    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }

    /// Goes back online.
    pub fn reset(&self) {
        self.online.set(true);
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
