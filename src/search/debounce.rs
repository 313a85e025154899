//! Debouncing for suggestion lookups.
//!
//! One [`Debouncer`] guards one input stream. Every keystroke calls
//! [`Debouncer::pass`]; only the most recent caller survives the quiet
//! period, so at most one store read fires per burst of typing.

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    current: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: Mutex::new(None),
        }
    }

    /// Wait out the quiet period. Returns true if this caller is still
    /// the most recent one afterwards; false if a newer call superseded
    /// it (the superseded caller must not issue its lookup).
    pub async fn pass(&self) -> bool {
        let token = CancellationToken::new();
        {
            let mut current = self
                .current
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(previous) = current.replace(token.clone()) {
                previous.cancel();
            }
        }

        tokio::select! {
            () = token.cancelled() => false,
            () = tokio::time::sleep(self.delay) => true,
        }
    }
}
