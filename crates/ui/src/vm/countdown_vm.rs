use chrono::{DateTime, Utc};
use greeting_core::countdown::{Countdown, Remaining};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountdownUnit {
    pub value: String,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountdownVm {
    pub units: Vec<CountdownUnit>,
    pub reached: bool,
    pub target_label: String,
}

#[must_use]
pub fn map_countdown(countdown: Countdown, now: DateTime<Utc>) -> CountdownVm {
    let remaining = countdown.remaining(now);
    CountdownVm {
        units: units(&remaining),
        reached: countdown.is_reached(now),
        target_label: countdown.target().format("%-d %B %Y, %H:%M UTC").to_string(),
    }
}

fn units(remaining: &Remaining) -> Vec<CountdownUnit> {
    vec![
        CountdownUnit {
            value: remaining.days.to_string(),
            label: if remaining.days == 1 { "day" } else { "days" },
        },
        CountdownUnit {
            value: format!("{:02}", remaining.hours),
            label: "hours",
        },
        CountdownUnit {
            value: format!("{:02}", remaining.minutes),
            label: "minutes",
        },
        CountdownUnit {
            value: format!("{:02}", remaining.seconds),
            label: "seconds",
        },
    ]
}
