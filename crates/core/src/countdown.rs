use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Holds the experience closed until `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    target: DateTime<Utc>,
}

/// Time left until the target, broken down for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub total: Duration,
}

impl Remaining {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.total <= Duration::zero()
    }
}

impl Countdown {
    #[must_use]
    pub fn new(target: DateTime<Utc>) -> Self {
        Self { target }
    }

    #[must_use]
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    #[must_use]
    pub fn is_reached(&self, now: DateTime<Utc>) -> bool {
        now >= self.target
    }

    /// Saturates at zero once the target has passed.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Remaining {
        let total = (self.target - now).max(Duration::zero());
        let secs = total.num_seconds();
        Remaining {
            days: secs / 86_400,
            hours: u32::try_from((secs / 3_600) % 24).unwrap_or(0),
            minutes: u32::try_from((secs / 60) % 60).unwrap_or(0),
            seconds: u32::try_from(secs % 60).unwrap_or(0),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn remaining_breaks_down_days_hours_minutes_seconds() {
        let now = fixed_now();
        let target = now
            + Duration::days(2)
            + Duration::hours(3)
            + Duration::minutes(4)
            + Duration::seconds(5);
        let remaining = Countdown::new(target).remaining(now);

        assert_eq!(remaining.days, 2);
        assert_eq!(remaining.hours, 3);
        assert_eq!(remaining.minutes, 4);
        assert_eq!(remaining.seconds, 5);
        assert!(!remaining.is_zero());
    }

    #[test]
    fn remaining_saturates_after_target() {
        let now = fixed_now();
        let countdown = Countdown::new(now - Duration::minutes(1));

        assert!(countdown.is_reached(now));
        let remaining = countdown.remaining(now);
        assert!(remaining.is_zero());
        assert_eq!(remaining.days, 0);
        assert_eq!(remaining.seconds, 0);
    }

    #[test]
    fn target_instant_counts_as_reached() {
        let now = fixed_now();
        assert!(Countdown::new(now).is_reached(now));
        assert!(!Countdown::new(now + Duration::seconds(1)).is_reached(now));
    }
}
