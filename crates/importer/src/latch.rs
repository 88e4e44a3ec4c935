use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Allows at most one import at a time among the clones of a latch.
#[derive(Debug, Clone, Default)]
pub struct ImportLatch {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of an import; releases the latch on drop.
#[derive(Debug)]
pub struct ImportPermit {
    busy: Arc<AtomicBool>,
}

impl ImportLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<ImportPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ImportPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ImportPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
