use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Hands out ship ids in connection order, starting at 0.
#[derive(Debug, Default)]
pub struct ShipIdAllocator {
    next: AtomicU32,
}

impl ShipIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Returns a process-unique identifier for correlating connection logs.
pub fn conn_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
