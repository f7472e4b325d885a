//! Search debouncing

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

/// Lets only the last of a burst of calls through.
///
/// Every call to [`Debouncer::settle`] supersedes the ones still waiting.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wait out the delay. Returns `false` when a newer call arrived in the
    /// meantime.
    pub async fn settle(&self) -> bool {
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        tokio::time::sleep(self.delay).await;

        self.generation.load(Ordering::Acquire) == ticket
    }
}
