use std::time::Duration;

use chrono::{Local, Timelike};
use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

/// Anti-abuse pacing settings: allowed hour window, daily quota and the
/// delays between sends. Read-only after startup.
#[derive(Debug, Clone)]
pub struct PacingPolicy {
    /// Sends are allowed while the local hour is in `[start_hour, end_hour)`.
    /// `start_hour == end_hour` leaves the window always open; a start after
    /// the end wraps past midnight.
    pub start_hour: u32,
    pub end_hour: u32,
    /// Maximum successful sends per day window.
    pub daily_limit: u32,
    /// Randomized wait after a successful send.
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Short fixed wait after a failed or rejected recipient.
    pub failure_delay: Duration,
    /// How long to pause once the daily quota is exhausted. Approximates
    /// "wait until tomorrow" without calendar tracking.
    pub quota_cooldown: Duration,
    /// Poll interval while waiting for the window to open.
    pub window_poll: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 21,
            daily_limit: 200,
            min_delay: Duration::from_secs(30),
            max_delay: Duration::from_secs(45),
            failure_delay: Duration::from_secs(5),
            quota_cooldown: Duration::from_secs(6 * 60 * 60),
            window_poll: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    Continue,
    Exhausted,
}

/// Gates every send attempt on the hour window and the daily quota, and
/// hands out the waits between sends.
pub struct Pacer {
    policy: PacingPolicy,
}

impl Pacer {
    pub fn new(policy: PacingPolicy) -> Self {
        Self { policy }
    }

    /// Sleep until the local hour enters the allowed window.
    ///
    /// Called before every attempt, not once per job: a long run crosses
    /// window boundaries. A polled sleep is plenty at this cadence.
    pub async fn await_window(&self) {
        loop {
            let hour = Local::now().hour();
            if in_window(hour, self.policy.start_hour, self.policy.end_hour) {
                return;
            }
            debug!(
                hour,
                start = self.policy.start_hour,
                end = self.policy.end_hour,
                "outside send window, waiting"
            );
            sleep(self.policy.window_poll).await;
        }
    }

    pub fn check_quota(&self, sent_today: u32) -> Quota {
        if sent_today >= self.policy.daily_limit {
            Quota::Exhausted
        } else {
            Quota::Continue
        }
    }

    /// Uniformly random pause in `[min_delay, max_delay]`, owed after every
    /// successful send.
    pub fn next_delay(&self) -> Duration {
        let min = self.policy.min_delay.as_millis() as u64;
        let max = self.policy.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    pub fn failure_delay(&self) -> Duration {
        self.policy.failure_delay
    }

    pub fn quota_cooldown(&self) -> Duration {
        self.policy.quota_cooldown
    }
}

fn in_window(hour: u32, start: u32, end: u32) -> bool {
    if start == end {
        true
    } else if start < end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_boundaries() {
        let pacer = Pacer::new(PacingPolicy {
            daily_limit: 50,
            ..PacingPolicy::default()
        });
        assert_eq!(pacer.check_quota(49), Quota::Continue);
        assert_eq!(pacer.check_quota(50), Quota::Exhausted);
        assert_eq!(pacer.check_quota(51), Quota::Exhausted);
    }

    #[test]
    fn next_delay_stays_in_range() {
        let pacer = Pacer::new(PacingPolicy {
            min_delay: Duration::from_millis(30),
            max_delay: Duration::from_millis(45),
            ..PacingPolicy::default()
        });
        for _ in 0..1000 {
            let delay = pacer.next_delay();
            assert!(delay >= Duration::from_millis(30));
            assert!(delay <= Duration::from_millis(45));
        }
    }

    #[test]
    fn window_bounds_are_start_inclusive_end_exclusive() {
        assert!(!in_window(8, 9, 21));
        assert!(in_window(9, 9, 21));
        assert!(in_window(20, 9, 21));
        assert!(!in_window(21, 9, 21));
    }

    #[test]
    fn window_wraps_past_midnight() {
        assert!(in_window(23, 22, 6));
        assert!(in_window(2, 22, 6));
        assert!(!in_window(12, 22, 6));
    }

    #[test]
    fn equal_bounds_leave_window_open() {
        for hour in 0..24 {
            assert!(in_window(hour, 0, 0));
        }
    }
}
