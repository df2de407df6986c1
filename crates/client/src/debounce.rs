//! Coalescing of rapid search input.

use std::time::Duration;

use tokio::sync::watch;

/// Waits for input to settle before releasing it.
///
/// Keystrokes are pushed into a [`watch`] channel; [`Debouncer::settled`]
/// resolves once no new value has arrived for the configured delay, yielding
/// only the latest one.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    delay: Duration,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the next settled value.
    ///
    /// Returns `None` once the sender is gone and its last value has already
    /// been released. A value pending when the sender drops is released
    /// immediately.
    pub async fn settled<T: Clone>(&self, rx: &mut watch::Receiver<T>) -> Option<T> {
        rx.changed().await.ok()?;
        loop {
            tokio::select! {
                () = tokio::time::sleep(self.delay) => {
                    return Some(rx.borrow_and_update().clone());
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        return Some(rx.borrow_and_update().clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::{Instant, sleep};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_coalesces_to_last_value() {
        let (tx, mut rx) = watch::channel(String::new());
        let debouncer = Debouncer::new(Duration::from_millis(300));

        tokio::spawn(async move {
            for term in ["s", "so", "sof", "sofa"] {
                tx.send(term.to_string()).unwrap();
                sleep(Duration::from_millis(100)).await;
            }
            sleep(Duration::from_secs(5)).await;
        });

        let start = Instant::now();
        let settled = debouncer.settled(&mut rx).await;
        assert_eq!(settled.as_deref(), Some("sofa"));
        // Last keystroke at 300ms plus the 300ms quiet period.
        assert_eq!(start.elapsed(), Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_settle() {
        let (tx, mut rx) = watch::channel(0_u32);
        let debouncer = Debouncer::default();

        tokio::spawn(async move {
            tx.send(1).unwrap();
            tx.send(2).unwrap();
            sleep(Duration::from_secs(1)).await;
            tx.send(3).unwrap();
            sleep(Duration::from_secs(1)).await;
        });

        assert_eq!(debouncer.settled(&mut rx).await, Some(2));
        assert_eq!(debouncer.settled(&mut rx).await, Some(3));
        assert_eq!(debouncer.settled(&mut rx).await, None);
    }
}
