//! Fixed-period schedule for `/motor_status` reads.

use embassy_time::{Duration, Instant};

/// Tracks when the next status poll is due.
///
/// The schedule is disarmed until [`StatusPoller::start`] is called and fires
/// at most once per elapsed interval. After a stall it resumes one interval
/// from the late tick instead of firing a burst of catch-up polls.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    interval: Duration,
    next_due: Option<Instant>,
}

impl StatusPoller {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next_due: None }
    }

    /// Arm the schedule; the first poll happens one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Disarm the schedule.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Deadline of the next poll, if polling is running.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns true if a poll should be issued at `now` and advances the schedule.
    pub fn fire(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + self.interval;
        self.next_due = Some(if next <= now { now + self.interval } else { next });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_idle_until_started() {
        let mut poller = StatusPoller::new(Duration::from_secs(1));
        assert!(!poller.is_running());
        assert!(!poller.fire(at(5_000)));
    }

    #[test]
    fn test_one_poll_per_elapsed_interval() {
        let mut poller = StatusPoller::new(Duration::from_secs(1));
        poller.start(at(0));

        let polls = (0..=3_500).step_by(50).filter(|ms| poller.fire(at(*ms))).count();
        assert_eq!(polls, 3);
        assert_eq!(poller.next_due(), Some(at(4_000)));
    }

    #[test]
    fn test_no_polls_after_stop() {
        let mut poller = StatusPoller::new(Duration::from_secs(1));
        poller.start(at(0));
        assert!(poller.fire(at(1_000)));
        poller.stop();
        assert!(!poller.fire(at(2_000)));
        assert!(!poller.fire(at(10_000)));
        assert_eq!(poller.next_due(), None);
    }

    #[test]
    fn test_stall_does_not_burst() {
        let mut poller = StatusPoller::new(Duration::from_secs(1));
        poller.start(at(0));
        assert!(poller.fire(at(4_300)));
        assert!(!poller.fire(at(4_400)));
        assert_eq!(poller.next_due(), Some(at(5_300)));
    }

    #[test]
    fn test_restart_rearms_from_mount_time() {
        let mut poller = StatusPoller::new(Duration::from_millis(500));
        poller.start(at(0));
        poller.stop();
        poller.start(at(10_000));
        assert!(!poller.fire(at(10_499)));
        assert!(poller.fire(at(10_500)));
    }
}
