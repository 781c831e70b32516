//! A civil date paired with a time of day, with no timezone attached.

use std::fmt;

use serde::Serialize;

use crate::date::CivilDate;
use crate::time::{ClockTime, NANOS_PER_SECOND, SECONDS_PER_DAY};

/// A date and time of day without any zone or offset association.
///
/// Day-level arithmetic delegates to [`CivilDate`]; sub-day arithmetic
/// wraps through [`ClockTime`] and folds the reported day carry back into
/// the date, so every operation is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LocalDateTime {
    date: CivilDate,
    time: ClockTime,
}

impl LocalDateTime {
    pub fn new(date: CivilDate, time: ClockTime) -> LocalDateTime {
        LocalDateTime { date, time }
    }

    /// The date at midnight.
    pub fn at_midnight(date: CivilDate) -> LocalDateTime {
        LocalDateTime { date, time: ClockTime::MIDNIGHT }
    }

    pub fn date(self) -> CivilDate {
        self.date
    }

    pub fn time(self) -> ClockTime {
        self.time
    }

    pub fn plus_days(self, days: i64) -> LocalDateTime {
        LocalDateTime { date: self.date.plus_days(days), time: self.time }
    }

    pub fn plus_weeks(self, weeks: i64) -> LocalDateTime {
        self.plus_days(weeks * 7)
    }

    pub fn plus_months(self, months: i64) -> LocalDateTime {
        LocalDateTime { date: self.date.plus_months(months), time: self.time }
    }

    pub fn plus_years(self, years: i64) -> LocalDateTime {
        LocalDateTime { date: self.date.plus_years(years), time: self.time }
    }

    pub fn plus_hours(self, hours: i64) -> LocalDateTime {
        let (time, carry) = self.time.plus_hours(hours);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    pub fn plus_minutes(self, minutes: i64) -> LocalDateTime {
        let (time, carry) = self.time.plus_minutes(minutes);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    pub fn plus_seconds(self, seconds: i64) -> LocalDateTime {
        let (time, carry) = self.time.plus_seconds(seconds);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    pub fn plus_nanos(self, nanos: i64) -> LocalDateTime {
        let (time, carry) = self.time.plus_nanos(nanos);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    pub fn minus_days(self, days: i64) -> LocalDateTime {
        LocalDateTime { date: self.date.minus_days(days), time: self.time }
    }

    pub fn minus_weeks(self, weeks: i64) -> LocalDateTime {
        self.minus_days(weeks * 7)
    }

    pub fn minus_months(self, months: i64) -> LocalDateTime {
        LocalDateTime { date: self.date.minus_months(months), time: self.time }
    }

    pub fn minus_years(self, years: i64) -> LocalDateTime {
        LocalDateTime { date: self.date.minus_years(years), time: self.time }
    }

    pub fn minus_hours(self, hours: i64) -> LocalDateTime {
        let (time, carry) = self.time.minus_hours(hours);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    pub fn minus_minutes(self, minutes: i64) -> LocalDateTime {
        let (time, carry) = self.time.minus_minutes(minutes);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    pub fn minus_seconds(self, seconds: i64) -> LocalDateTime {
        let (time, carry) = self.time.minus_seconds(seconds);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    pub fn minus_nanos(self, nanos: i64) -> LocalDateTime {
        let (time, carry) = self.time.minus_nanos(nanos);
        LocalDateTime { date: self.date.plus_days(carry), time }
    }

    /// Seconds since the epoch *as if* this local reading were UTC.
    ///
    /// The conversion layer subtracts the resolved offset from this to get
    /// the true instant.
    pub fn epoch_second_assuming_utc(self) -> i64 {
        self.date.to_epoch_day() * SECONDS_PER_DAY + self.time.second_of_day()
    }

    /// Inverse of [`LocalDateTime::epoch_second_assuming_utc`].
    pub fn from_epoch_second_assuming_utc(seconds: i64, nanosecond: u32) -> LocalDateTime {
        let epoch_day = seconds.div_euclid(SECONDS_PER_DAY);
        let second_of_day = seconds.rem_euclid(SECONDS_PER_DAY);
        LocalDateTime {
            date: CivilDate::from_epoch_day(epoch_day),
            time: ClockTime::from_second_of_day(second_of_day, nanosecond),
        }
    }

    /// Nanoseconds since the epoch assuming UTC; used by the exact-count
    /// difference math.
    pub(crate) fn epoch_nano_assuming_utc(self) -> i128 {
        i128::from(self.date.to_epoch_day()) * i128::from(SECONDS_PER_DAY)
            * i128::from(NANOS_PER_SECOND)
            + self.time.nanosecond_of_day()
    }
}

impl fmt::Display for LocalDateTime {
    /// Extended ISO form, `YYYY-MM-DDTHH:MM:SS[.fraction]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u8, d: u8, h: u8, mi: u8, s: u8) -> LocalDateTime {
        LocalDateTime::new(
            CivilDate::new(y, mo, d).unwrap(),
            ClockTime::new(h, mi, s, 0).unwrap(),
        )
    }

    #[test]
    fn test_plus_hours_carries_into_date() {
        assert_eq!(dt(2014, 1, 14, 23, 30, 0).plus_hours(2), dt(2014, 1, 15, 1, 30, 0));
        assert_eq!(dt(2014, 1, 14, 1, 0, 0).plus_hours(-2), dt(2014, 1, 13, 23, 0, 0));
    }

    #[test]
    fn test_plus_seconds_across_year_boundary() {
        assert_eq!(dt(2020, 12, 31, 23, 59, 59).plus_seconds(1), dt(2021, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_plus_months_preserves_time() {
        assert_eq!(dt(2020, 1, 31, 19, 30, 0).plus_months(1), dt(2020, 2, 29, 19, 30, 0));
    }

    #[test]
    fn test_minus_mirrors_plus() {
        assert_eq!(dt(2014, 1, 15, 1, 30, 0).minus_hours(2), dt(2014, 1, 14, 23, 30, 0));
        assert_eq!(dt(2021, 1, 1, 0, 0, 0).minus_seconds(1), dt(2020, 12, 31, 23, 59, 59));
        assert_eq!(dt(2020, 3, 31, 9, 0, 0).minus_months(1), dt(2020, 2, 29, 9, 0, 0));
        assert_eq!(dt(2021, 1, 8, 9, 0, 0).minus_weeks(1), dt(2021, 1, 1, 9, 0, 0));
        assert_eq!(dt(2024, 2, 29, 9, 0, 0).minus_years(1), dt(2023, 2, 28, 9, 0, 0));
    }

    #[test]
    fn test_epoch_second_round_trip() {
        let value = dt(2014, 1, 14, 19, 30, 0);
        let secs = value.epoch_second_assuming_utc();
        assert_eq!(LocalDateTime::from_epoch_second_assuming_utc(secs, 0), value);

        let early = dt(1969, 12, 31, 23, 0, 0);
        let secs = early.epoch_second_assuming_utc();
        assert_eq!(secs, -3600);
        assert_eq!(LocalDateTime::from_epoch_second_assuming_utc(secs, 0), early);
    }

    #[test]
    fn test_epoch_second_known_value() {
        // 2014-01-14T19:30:00 UTC
        assert_eq!(dt(2014, 1, 14, 19, 30, 0).epoch_second_assuming_utc(), 1_389_727_800);
    }

    #[test]
    fn test_display() {
        assert_eq!(dt(2014, 1, 14, 19, 30, 0).to_string(), "2014-01-14T19:30:00");
    }

    #[test]
    fn test_ordering_date_major() {
        assert!(dt(2014, 1, 14, 23, 0, 0) < dt(2014, 1, 15, 0, 0, 0));
        assert!(dt(2014, 1, 14, 9, 0, 0) < dt(2014, 1, 14, 17, 0, 0));
    }
}
