//! Idle timer.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Tracks time since the last successfully processed message.
///
/// Lives in the worker's per-run state and is touched only by the loop.
#[derive(Debug, Clone)]
pub struct IdleTimer {
    since: DateTime<Utc>,
    timeout: TimeDelta,
}

impl IdleTimer {
    pub fn new(now: DateTime<Utc>, timeout: Duration) -> Self {
        Self {
            since: now,
            timeout: TimeDelta::from_std(timeout).unwrap_or(TimeDelta::MAX),
        }
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.since = now;
    }

    pub fn idle_for(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.since
    }

    /// Strictly longer than the timeout.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.idle_for(now) > self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_expires_only_after_timeout_has_fully_passed() {
        let timer = IdleTimer::new(t0(), Duration::from_secs(10));
        assert!(!timer.is_expired(t0()));
        assert!(!timer.is_expired(t0() + TimeDelta::seconds(10)));
        assert!(timer.is_expired(t0() + TimeDelta::milliseconds(10_001)));
    }

    #[test]
    fn test_reset_restarts_the_window() {
        let mut timer = IdleTimer::new(t0(), Duration::from_secs(10));
        timer.reset(t0() + TimeDelta::seconds(9));
        assert!(!timer.is_expired(t0() + TimeDelta::seconds(15)));
        assert_eq!(
            timer.idle_for(t0() + TimeDelta::seconds(15)),
            TimeDelta::seconds(6)
        );
    }

    #[test]
    fn test_huge_timeout_never_expires() {
        let timer = IdleTimer::new(t0(), Duration::MAX);
        assert!(!timer.is_expired(t0() + TimeDelta::days(365 * 100)));
    }
}
