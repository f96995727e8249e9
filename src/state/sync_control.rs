use crate::api::{ApiError, ApiErrorKind};
use crate::drafts::REMOTE_DELETED_MESSAGE;

pub(crate) const BACKOFF_START_MS: u64 = 500;
pub(crate) const BACKOFF_MAX_MS: u64 = 30_000;

pub(crate) fn next_backoff_ms(current: u64) -> u64 {
    current.saturating_mul(2).clamp(BACKOFF_START_MS, BACKOFF_MAX_MS)
}

/// What to do after the store rejected our credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AuthRecovery {
    Refresh,
    SignOut,
}

/// Toast text for a failed write.
pub(crate) fn failure_message(failure: &str, e: &ApiError) -> String {
    let reason = if e.kind == ApiErrorKind::NotFound {
        REMOTE_DELETED_MESSAGE
    } else {
        e.message.as_str()
    };
    format!("{failure}: {reason}")
}

/// Bookkeeping for the live subscription: who is subscribed, whether a read
/// is in flight, and how failures are retried. Holds no timers or futures.
#[derive(Clone, Debug)]
pub(crate) struct SyncControl {
    subscribers: usize,
    fetch_in_flight: bool,
    refetch_queued: bool,
    refresh_attempted: bool,
    backoff_ms: u64,
}

impl Default for SyncControl {
    fn default() -> Self {
        Self {
            subscribers: 0,
            fetch_in_flight: false,
            refetch_queued: false,
            refresh_attempted: false,
            backoff_ms: BACKOFF_START_MS,
        }
    }
}

impl SyncControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true for the first subscriber, which starts polling.
    pub fn subscribe(&mut self) -> bool {
        self.subscribers += 1;
        self.subscribers == 1
    }

    /// Returns true when the last subscriber left, which stops polling.
    pub fn unsubscribe(&mut self) -> bool {
        if self.subscribers == 0 {
            return false;
        }
        self.subscribers -= 1;
        self.subscribers == 0
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribers > 0
    }

    /// Claims the single read slot. While a read is in flight, further
    /// requests collapse into one queued follow-up.
    pub fn try_begin_fetch(&mut self) -> bool {
        if self.fetch_in_flight {
            self.refetch_queued = true;
            return false;
        }
        self.fetch_in_flight = true;
        true
    }

    /// Releases the read slot. Returns true if a follow-up read was queued.
    pub fn finish_fetch(&mut self) -> bool {
        self.fetch_in_flight = false;
        std::mem::take(&mut self.refetch_queued)
    }

    /// A read or write reached the store.
    pub fn on_success(&mut self) {
        self.refresh_attempted = false;
        self.backoff_ms = BACKOFF_START_MS;
    }

    /// One refresh per failure streak; a second rejection signs out.
    pub fn on_unauthorized(&mut self) -> AuthRecovery {
        if self.refresh_attempted {
            return AuthRecovery::SignOut;
        }
        self.refresh_attempted = true;
        AuthRecovery::Refresh
    }

    /// Delay before the next retry; each call doubles the following one.
    pub fn take_retry_delay(&mut self) -> u64 {
        let delay = self.backoff_ms;
        self.backoff_ms = next_backoff_ms(delay);
        delay
    }

    pub fn reset_backoff(&mut self) {
        self.backoff_ms = BACKOFF_START_MS;
    }

    /// Forgets account state. Subscribers and the read slot survive: pages
    /// stay mounted and an in-flight read still has to finish.
    pub fn reset(&mut self) {
        self.refresh_attempted = false;
        self.backoff_ms = BACKOFF_START_MS;
        self.refetch_queued = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_to_cap() {
        let mut c = SyncControl::new();
        let seen: Vec<u64> = (0..9).map(|_| c.take_retry_delay()).collect();
        assert_eq!(&seen[..4], &[500, 1_000, 2_000, 4_000]);
        assert_eq!(*seen.last().unwrap(), BACKOFF_MAX_MS);
        assert_eq!(next_backoff_ms(BACKOFF_MAX_MS), BACKOFF_MAX_MS);

        c.on_success();
        assert_eq!(c.take_retry_delay(), BACKOFF_START_MS);
    }

    #[test]
    fn test_first_subscriber_starts_and_last_stops() {
        let mut c = SyncControl::new();
        assert!(!c.is_subscribed());
        assert!(c.subscribe());
        assert!(!c.subscribe());
        assert!(c.is_subscribed());

        assert!(!c.unsubscribe());
        assert!(c.is_subscribed());
        assert!(c.unsubscribe());
        assert!(!c.is_subscribed());

        // Extra drops never underflow or restart anything.
        assert!(!c.unsubscribe());
        assert!(c.subscribe());
    }

    #[test]
    fn test_concurrent_fetches_collapse_into_one_followup() {
        let mut c = SyncControl::new();
        assert!(c.try_begin_fetch());
        assert!(!c.try_begin_fetch());
        assert!(!c.try_begin_fetch());

        assert!(c.finish_fetch());
        assert!(c.try_begin_fetch());
        assert!(!c.finish_fetch());
    }

    #[test]
    fn test_unauthorized_refreshes_once_then_signs_out() {
        let mut c = SyncControl::new();
        assert_eq!(c.on_unauthorized(), AuthRecovery::Refresh);
        assert_eq!(c.on_unauthorized(), AuthRecovery::SignOut);

        c.on_success();
        assert_eq!(c.on_unauthorized(), AuthRecovery::Refresh);

        c.reset();
        assert_eq!(c.on_unauthorized(), AuthRecovery::Refresh);
    }

    #[test]
    fn test_reset_keeps_subscribers_and_read_slot() {
        let mut c = SyncControl::new();
        c.subscribe();
        assert!(c.try_begin_fetch());
        assert!(!c.try_begin_fetch());
        c.take_retry_delay();

        c.reset();
        assert!(c.is_subscribed());
        assert!(!c.try_begin_fetch());
        c.finish_fetch();
        assert_eq!(c.take_retry_delay(), BACKOFF_START_MS);
    }

    #[test]
    fn test_failure_message() {
        let e = ApiError {
            kind: ApiErrorKind::Http,
            message: "quota exceeded".to_string(),
        };
        assert_eq!(failure_message("Error adding item", &e), "Error adding item: quota exceeded");

        let gone = ApiError {
            kind: ApiErrorKind::NotFound,
            message: "404".to_string(),
        };
        assert_eq!(
            failure_message("Error updating item", &gone),
            format!("Error updating item: {REMOTE_DELETED_MESSAGE}")
        );
    }
}
