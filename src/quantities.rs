use std::{
    fmt::Display,
    ops::{Add, Div, Sub},
};

use format_num::format_num;
use serde::{Deserialize, Serialize};

pub type Float = f64;

/// A span of simulated time, in seconds.
#[derive(PartialEq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TimeSpan(Float);

impl Eq for TimeSpan {}

impl PartialOrd for TimeSpan {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeSpan {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan(0.);
    pub const MIN: TimeSpan = TimeSpan(Float::MIN);
    pub const MAX: TimeSpan = TimeSpan(Float::MAX);

    #[must_use]
    pub const fn seconds(self) -> Float {
        self.0
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < 0.
    }
}

#[must_use]
pub const fn seconds(value: Float) -> TimeSpan {
    TimeSpan(value)
}

impl Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", format_num!(".3s", self.0))
    }
}

impl Add for TimeSpan {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        TimeSpan(self.0 + rhs.0)
    }
}

impl Sub for TimeSpan {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        TimeSpan(self.0 - rhs.0)
    }
}

impl Div<Float> for TimeSpan {
    type Output = Self;

    fn div(self, rhs: Float) -> Self::Output {
        TimeSpan(self.0 / rhs)
    }
}

/// An instant of simulated time, measured from the start of the run.
#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Time(TimeSpan);

impl Time {
    pub const MIN: Time = Time(TimeSpan::MIN);
    pub const SIM_START: Time = Time(TimeSpan::ZERO);

    #[must_use]
    pub fn from_sim_start(t: TimeSpan) -> Time {
        Time::SIM_START + t
    }
}

impl Sub<Time> for Time {
    type Output = TimeSpan;

    fn sub(self, other: Time) -> Self::Output {
        self.0 - other.0
    }
}

impl Add<TimeSpan> for Time {
    type Output = Time;

    fn add(self, other: TimeSpan) -> Self::Output {
        Time(self.0 + other)
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}t", self.0.seconds())
    }
}
