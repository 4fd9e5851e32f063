#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Day/night clock that drives the night-time wave cycle.
//!
//! The clock maps real simulated seconds onto a 24 hour dial. Every call to
//! [`Clock::advance`] sweeps the dial from the previous time to the new one and
//! reports each boundary it crossed, in chronological order, so coarse and
//! fine-grained ticks observe exactly the same dusk and dawn edges.

use serde::Deserialize;

/// Hours on the dial.
pub const HOURS_PER_DAY: f64 = 24.0;
/// Hour at which night falls (7 PM).
pub const DUSK_HOUR: f64 = 19.0;
/// Hour at which night ends (5 AM).
pub const DAWN_HOUR: f64 = 5.0;

const BOUNDARY_EPSILON: f64 = 1e-5;
const DEFAULT_DAY_LENGTH_SECONDS: f32 = 24.0;
/// Whole days one advance reports edge by edge; older days are only counted.
const MAX_SWEPT_DAYS: f64 = 64.0;

/// Configuration parameters required to construct the clock.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Simulated seconds for one full 24 hour day.
    pub day_length_seconds: f32,
    /// Hour of day the simulation starts at.
    pub start_hour: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            day_length_seconds: DEFAULT_DAY_LENGTH_SECONDS,
            start_hour: 0.0,
        }
    }
}

/// Boundary crossed while the clock advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClockEdge {
    /// The dial passed 5 AM after a night.
    Dawn {
        /// Day that dawned.
        day: u32,
    },
    /// The dial passed 7 PM during the day.
    Dusk {
        /// Day on which night fell.
        day: u32,
    },
    /// The dial wrapped past midnight.
    Midnight {
        /// Day counter after the wrap.
        days_survived: u32,
    },
}

/// Twelve hour rendering of the current time for display collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClockDisplay {
    /// Hour on a 12 hour dial, `1..=12`.
    pub hour: u32,
    /// Minute within the hour, `0..60`.
    pub minute: u32,
    /// Half of the day.
    pub meridiem: Meridiem,
}

/// Half of the day on a 12 hour dial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Meridiem {
    /// Midnight up to noon.
    Am,
    /// Noon up to midnight.
    Pm,
}

impl std::fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = match self.meridiem {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        };
        write!(f, "{:02}:{:02} {suffix}", self.hour, self.minute)
    }
}

/// Cyclical time of day with a night latch.
#[derive(Clone, Debug)]
pub struct Clock {
    time_of_day: f64,
    days_survived: u32,
    day_length_seconds: f64,
    night: bool,
}

impl Clock {
    /// Creates a clock on day one at the configured start hour.
    #[must_use]
    pub fn new(config: ClockConfig) -> Self {
        let day_length_seconds =
            if config.day_length_seconds.is_finite() && config.day_length_seconds > 0.0 {
                f64::from(config.day_length_seconds)
            } else {
                tracing::warn!(
                    day_length_seconds = config.day_length_seconds,
                    "invalid day length; using default"
                );
                f64::from(DEFAULT_DAY_LENGTH_SECONDS)
            };
        let time_of_day = if config.start_hour.is_finite() {
            f64::from(config.start_hour).rem_euclid(HOURS_PER_DAY)
        } else {
            0.0
        };

        Self {
            time_of_day,
            days_survived: 1,
            day_length_seconds,
            night: !(DAWN_HOUR..DUSK_HOUR).contains(&time_of_day),
        }
    }

    /// Hour of day in `0.0..24.0`.
    #[must_use]
    pub fn time_of_day(&self) -> f64 {
        self.time_of_day
    }

    /// Number of the current day, starting at one.
    #[must_use]
    pub fn days_survived(&self) -> u32 {
        self.days_survived
    }

    /// Simulated seconds in one day.
    #[must_use]
    pub fn day_length_seconds(&self) -> f64 {
        self.day_length_seconds
    }

    /// Reports whether night has fallen and dawn has not yet arrived.
    #[must_use]
    pub fn is_night(&self) -> bool {
        self.night
    }

    /// Twelve hour representation of the current time.
    #[must_use]
    pub fn display(&self) -> ClockDisplay {
        let hours = self.time_of_day.floor();
        let minute = ((self.time_of_day - hours) * 60.0).floor() as u32;
        let hours = hours as u32;
        let meridiem = if hours >= 12 { Meridiem::Pm } else { Meridiem::Am };
        let hour = match hours % 12 {
            0 => 12,
            other => other,
        };
        ClockDisplay {
            hour,
            minute: minute.min(59),
            meridiem,
        }
    }

    /// Advances the dial by `delta_seconds` of simulated time.
    ///
    /// Every boundary swept by the advance is appended to `out` in
    /// chronological order. Dusk is reported only while the night latch is
    /// clear and dawn only while it is set, so each fires once per crossing.
    /// A delta spanning more than 64 days counts the oldest whole days without
    /// reporting their edges.
    pub fn advance(&mut self, delta_seconds: f32, out: &mut Vec<ClockEdge>) {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            tracing::warn!(delta_seconds, "ignoring invalid clock delta");
            return;
        }

        let mut remaining = f64::from(delta_seconds) * HOURS_PER_DAY / self.day_length_seconds;
        let whole_days = (remaining / HOURS_PER_DAY).floor();
        if whole_days > MAX_SWEPT_DAYS {
            let skipped = whole_days - MAX_SWEPT_DAYS;
            tracing::warn!(skipped, "clock delta spans too many days; folding");
            self.days_survived = self.days_survived.saturating_add(skipped as u32);
            remaining = MAX_SWEPT_DAYS * HOURS_PER_DAY + remaining.rem_euclid(HOURS_PER_DAY);
        }

        while remaining > 0.0 {
            let boundary = next_boundary(self.time_of_day);
            let distance = boundary - self.time_of_day;
            if remaining + BOUNDARY_EPSILON < distance {
                self.time_of_day += remaining;
                break;
            }

            remaining = (remaining - distance).max(0.0);
            self.cross(boundary, out);
        }
    }

    fn cross(&mut self, boundary: f64, out: &mut Vec<ClockEdge>) {
        if boundary >= HOURS_PER_DAY {
            self.time_of_day = 0.0;
            self.days_survived = self.days_survived.saturating_add(1);
            out.push(ClockEdge::Midnight {
                days_survived: self.days_survived,
            });
            return;
        }

        self.time_of_day = boundary;
        if boundary == DUSK_HOUR && !self.night {
            self.night = true;
            out.push(ClockEdge::Dusk {
                day: self.days_survived,
            });
        } else if boundary == DAWN_HOUR && self.night {
            self.night = false;
            out.push(ClockEdge::Dawn {
                day: self.days_survived,
            });
        }
    }
}

fn next_boundary(time_of_day: f64) -> f64 {
    if time_of_day < DAWN_HOUR {
        DAWN_HOUR
    } else if time_of_day < DUSK_HOUR {
        DUSK_HOUR
    } else {
        HOURS_PER_DAY
    }
}
