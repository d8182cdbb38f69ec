use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;

/// Default delay between revealed characters, matching the pacing the web UI
/// used for its fake typing effect.
pub const DEFAULT_SPEED: Duration = Duration::from_millis(20);

/// Handle to a running reveal. Dropping it does NOT stop the task; the
/// controller keeps handles so it can cancel reveals whose transcript slot is
/// being switched away.
pub struct RevealHandle {
    task: JoinHandle<()>,
}

impl RevealHandle {
    /// Stop the reveal where it is. The slot keeps whatever prefix was
    /// already written.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the reveal to run to completion (or to its cancellation).
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Simulate incremental token arrival for a reply that actually arrived as
/// one complete string. Every `speed`, the cursor advances by one character
/// and `on_update` gets the prefix up to it; the final call's argument equals
/// `text` exactly, and the task exits. Prefixes always fall on `char`
/// boundaries.
pub fn reveal(
    text: String,
    speed: Duration,
    mut on_update: impl FnMut(&str) + Send + 'static,
) -> RevealHandle {
    let task = tokio::spawn(async move {
        if text.is_empty() {
            return;
        }

        // Byte offset after each successive character; the last one is the
        // full string.
        let ends: Vec<usize> = text
            .char_indices()
            .skip(1)
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut ticker = interval(speed);
        // An interval's first tick completes immediately; consume it so the
        // first character appears after one full period, like setInterval.
        ticker.tick().await;

        for end in ends {
            ticker.tick().await;
            on_update(&text[..end]);
        }
    });

    RevealHandle { task }
}
