//! Clock-of-day model: nanosecond-resolution time of day.
//!
//! [`ClockTime`] covers exactly one day. Arithmetic wraps within the day
//! and reports the signed whole-day carry, which callers combine with
//! [`CivilDate::plus_days`](crate::CivilDate::plus_days); it never fails.

use std::fmt;

use serde::Serialize;

use crate::error::{CivilError, Result};

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;
pub(crate) const NANOS_PER_DAY: i128 = (SECONDS_PER_DAY as i128) * (NANOS_PER_SECOND as i128);

/// An immutable time of day with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

impl ClockTime {
    /// Midnight, the start of the day.
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0, second: 0, nanosecond: 0 };

    /// Construct a time of day, validating all fields.
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::InvalidTime`] when any field is out of range.
    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Result<ClockTime> {
        if hour > 23 {
            return Err(CivilError::InvalidTime(format!("hour must be 0-23, got {hour}")));
        }
        if minute > 59 {
            return Err(CivilError::InvalidTime(format!("minute must be 0-59, got {minute}")));
        }
        if second > 59 {
            return Err(CivilError::InvalidTime(format!("second must be 0-59, got {second}")));
        }
        if nanosecond > 999_999_999 {
            return Err(CivilError::InvalidTime(format!(
                "nanosecond must be 0-999999999, got {nanosecond}"
            )));
        }
        Ok(ClockTime { hour, minute, second, nanosecond })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn second(self) -> u8 {
        self.second
    }

    pub fn nanosecond(self) -> u32 {
        self.nanosecond
    }

    /// Seconds since midnight (0-86399).
    pub fn second_of_day(self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }

    /// Nanoseconds since midnight.
    pub fn nanosecond_of_day(self) -> i128 {
        i128::from(self.second_of_day()) * i128::from(NANOS_PER_SECOND)
            + i128::from(self.nanosecond)
    }

    /// Time of day from seconds since midnight. Caller guarantees range.
    pub(crate) fn from_second_of_day(second_of_day: i64, nanosecond: u32) -> ClockTime {
        debug_assert!((0..SECONDS_PER_DAY).contains(&second_of_day));
        ClockTime {
            hour: (second_of_day / 3600) as u8,
            minute: (second_of_day % 3600 / 60) as u8,
            second: (second_of_day % 60) as u8,
            nanosecond,
        }
    }

    /// Add hours, wrapping within the day; returns the new time and the
    /// signed number of whole days crossed.
    pub fn plus_hours(self, hours: i64) -> (ClockTime, i64) {
        self.offset_seconds(i128::from(hours) * 3600)
    }

    /// Add minutes, wrapping within the day, with signed day carry.
    pub fn plus_minutes(self, minutes: i64) -> (ClockTime, i64) {
        self.offset_seconds(i128::from(minutes) * 60)
    }

    /// Add seconds, wrapping within the day, with signed day carry.
    pub fn plus_seconds(self, seconds: i64) -> (ClockTime, i64) {
        self.offset_seconds(i128::from(seconds))
    }

    /// Add nanoseconds, wrapping within the day, with signed day carry.
    pub fn plus_nanos(self, nanos: i64) -> (ClockTime, i64) {
        self.offset_nanos(i128::from(nanos))
    }

    /// Subtract hours, wrapping within the day, with signed day carry.
    pub fn minus_hours(self, hours: i64) -> (ClockTime, i64) {
        self.offset_seconds(i128::from(hours) * -3600)
    }

    /// Subtract minutes, wrapping within the day, with signed day carry.
    pub fn minus_minutes(self, minutes: i64) -> (ClockTime, i64) {
        self.offset_seconds(i128::from(minutes) * -60)
    }

    /// Subtract seconds, wrapping within the day, with signed day carry.
    pub fn minus_seconds(self, seconds: i64) -> (ClockTime, i64) {
        self.offset_seconds(-i128::from(seconds))
    }

    /// Subtract nanoseconds, wrapping within the day, with signed day carry.
    pub fn minus_nanos(self, nanos: i64) -> (ClockTime, i64) {
        self.offset_nanos(-i128::from(nanos))
    }

    /// The shared widening step: the math runs in i128 so no i64 argument
    /// (or its negation) can overflow. The day carry of any i64 input fits
    /// back into i64.
    fn offset_seconds(self, seconds: i128) -> (ClockTime, i64) {
        let total = i128::from(self.second_of_day()) + seconds;
        let carry = total.div_euclid(i128::from(SECONDS_PER_DAY));
        let time = ClockTime::from_second_of_day(
            total.rem_euclid(i128::from(SECONDS_PER_DAY)) as i64,
            self.nanosecond,
        );
        (time, carry as i64)
    }

    fn offset_nanos(self, nanos: i128) -> (ClockTime, i64) {
        let total = self.nanosecond_of_day() + nanos;
        let carry = total.div_euclid(NANOS_PER_DAY);
        let of_day = total.rem_euclid(NANOS_PER_DAY);
        let time = ClockTime::from_second_of_day(
            (of_day / i128::from(NANOS_PER_SECOND)) as i64,
            (of_day % i128::from(NANOS_PER_SECOND)) as u32,
        );
        (time, carry as i64)
    }
}

impl fmt::Display for ClockTime {
    /// `HH:MM:SS`, with the fraction appended only when non-zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.nanosecond != 0 {
            let fraction = format!("{:09}", self.nanosecond);
            write!(f, ".{}", fraction.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
