//! Process-wide hit counter.

use std::sync::Mutex;

/// Request counter guarded by a single mutex. Starts at zero, never resets.
#[derive(Debug, Default)]
pub struct HitCounter {
    count: Mutex<u64>,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one and return the new value.
    pub fn increment(&self) -> u64 {
        // A poisoned lock still guards a valid integer.
        let mut n = self.count.lock().unwrap_or_else(|p| p.into_inner());
        *n += 1;
        *n
    }

    pub fn snapshot(&self) -> u64 {
        *self.count.lock().unwrap_or_else(|p| p.into_inner())
    }
}
