//! Debounce for directory lookups.
//!
//! A mention query changes on every keystroke; issuing a directory lookup
//! per keystroke would flood the source. Each query change arms the
//! debounce and gets a ticket; only the ticket still current after the
//! delay reaches the source. Superseded tickets resolve to cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

/// Upper bound on the debounce delay in milliseconds.
pub const MAX_DEBOUNCE_MS: u64 = 2000;

/// Debounce gate shared between the lookup client and its tasks.
#[derive(Debug)]
pub struct LookupDebounce {
    /// Delay between arming and firing.
    delay: Duration,

    /// Ticket of the most recent arm call.
    current: AtomicU64,

    /// Wakes pending waits when a newer ticket arrives.
    superseded: Arc<Notify>,
}

impl LookupDebounce {
    /// Creates a debounce gate with the given delay.
    ///
    /// # Panics
    /// Panics if the delay is zero or greater than `MAX_DEBOUNCE_MS`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        assert!(!delay.is_zero(), "debounce delay must be positive");
        assert!(
            delay.as_millis() <= u128::from(MAX_DEBOUNCE_MS),
            "debounce delay must be <= {} ms",
            MAX_DEBOUNCE_MS
        );

        Self {
            delay,
            current: AtomicU64::new(0),
            superseded: Arc::new(Notify::new()),
        }
    }

    /// Arms the debounce for a new query change and returns its ticket.
    ///
    /// Any pending wait for an older ticket is woken and resolves to
    /// cancelled.
    pub fn arm(&self) -> u64 {
        let ticket = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.superseded.notify_waiters();
        ticket
    }

    /// Waits out the delay for `ticket`.
    ///
    /// Returns `true` when the ticket survived the delay (no newer arm
    /// call), `false` when it was superseded or cancelled.
    pub async fn settle(&self, ticket: u64) -> bool {
        let superseded = Arc::clone(&self.superseded);

        tokio::select! {
            () = tokio::time::sleep(self.delay) => {
                self.current.load(Ordering::SeqCst) == ticket
            }
            () = superseded.notified() => false,
        }
    }

    /// Cancels whatever is pending without arming a new ticket holder.
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
        self.superseded.notify_waiters();
    }

    /// Returns whether `ticket` is still the current one.
    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.load(Ordering::SeqCst) == ticket
    }

    /// Returns the configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_hands_out_increasing_tickets() {
        let debounce = LookupDebounce::new(Duration::from_millis(100));
        assert_eq!(debounce.arm(), 1);
        assert_eq!(debounce.arm(), 2);
        assert_eq!(debounce.arm(), 3);
    }

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let debounce = LookupDebounce::new(Duration::from_millis(100));

        let first = debounce.arm();
        assert!(debounce.is_current(first));

        let second = debounce.arm();
        assert!(!debounce.is_current(first));
        assert!(debounce.is_current(second));
    }

    #[test]
    fn test_cancel_invalidates_current_ticket() {
        let debounce = LookupDebounce::new(Duration::from_millis(100));
        let ticket = debounce.arm();

        debounce.cancel();
        assert!(!debounce.is_current(ticket));
    }

    #[tokio::test]
    async fn test_settle_fires_for_uncontested_ticket() {
        let debounce = LookupDebounce::new(Duration::from_millis(10));
        let ticket = debounce.arm();
        assert!(debounce.settle(ticket).await);
    }

    #[tokio::test]
    async fn test_settle_resolves_cancelled_when_superseded() {
        let debounce = Arc::new(LookupDebounce::new(Duration::from_millis(100)));
        let ticket = debounce.arm();

        let waiter = Arc::clone(&debounce);
        let handle = tokio::spawn(async move { waiter.settle(ticket).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        debounce.arm();

        assert!(!handle.await.unwrap());
    }

    #[test]
    #[should_panic(expected = "debounce delay must be positive")]
    fn test_zero_delay_panics() {
        let _ = LookupDebounce::new(Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "debounce delay must be <=")]
    fn test_excessive_delay_panics() {
        let _ = LookupDebounce::new(Duration::from_millis(MAX_DEBOUNCE_MS + 1));
    }
}
