use std::time::{Duration, Instant};
use tracing::debug;

pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// A cancellable periodic schedule.
///
/// At most one schedule exists at a time: arming an armed countdown keeps the
/// existing deadline, and `cancel` drops it outright. The owner polls it from
/// its own event loop and gets back how many periods elapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    period: Duration,
    next_fire: Option<Instant>,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_fire: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_fire.is_some()
    }

    pub fn arm(&mut self, now: Instant) {
        if self.next_fire.is_none() {
            debug!(period_ms = self.period.as_millis() as u64, "countdown armed");
            self.next_fire = Some(now + self.period);
        }
    }

    pub fn cancel(&mut self) {
        if self.next_fire.take().is_some() {
            debug!("countdown cancelled");
        }
    }

    /// Number of whole periods that have elapsed since the last poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_fire else {
            return 0;
        };

        let mut fired = 0;
        while now >= next {
            fired += 1;
            next += self.period;
        }

        self.next_fire = Some(next);
        fired
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_fire
            .map(|next| next.saturating_duration_since(now))
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(COUNTDOWN_PERIOD)
    }
}
