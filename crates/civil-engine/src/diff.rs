//! Difference engine: calendar periods, exact durations, and truncating
//! whole-unit counts.
//!
//! [`Period`] and [`Duration`] answer different questions and are never
//! conflated: a period is a calendar-relative offset ("2 months and 10
//! days apart", month lengths matter), a duration is exact elapsed time
//! on the universal time line (zone- and calendar-independent).

use std::fmt;

use serde::Serialize;

use crate::date::CivilDate;
use crate::datetime::LocalDateTime;
use crate::time::NANOS_PER_SECOND;
use crate::zoned::Instant;

const NANOS_PER_DAY: i128 = 86_400 * NANOS_PER_SECOND as i128;

// ── Period ──────────────────────────────────────────────────────────────────

/// A signed calendar-relative offset in years, months and days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Period {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl Period {
    pub const ZERO: Period = Period { years: 0, months: 0, days: 0 };

    pub fn new(years: i32, months: i32, days: i32) -> Period {
        Period { years, months, days }
    }

    /// Calendar-component difference from `start` to `end`.
    ///
    /// Forward, months are anchored to `start`'s day of month (clamped per
    /// target month) and trimmed if the estimate overshoots. Backward, one
    /// clamped month is subtracted at a time from the running date, so each
    /// step clamps from where the previous one landed. The sign matches
    /// the sign of `end - start`.
    ///
    /// Because month lengths differ, `between(a, b)` and `between(b, a)`
    /// need not be exact negations and this is expected, not a bug:
    /// `between(2020-01-31, 2020-03-31)` is 2 months 0 days, while
    /// `between(2020-03-31, 2020-01-31)` is -1 month -29 days (the first
    /// backward step clamps 2020-03-31 to 2020-02-29, which is still 29
    /// days past 2020-01-31, and a second step would overshoot).
    pub fn between(start: CivilDate, end: CivilDate) -> Period {
        if end >= start {
            let mut months = end.proleptic_month() - start.proleptic_month();
            // The anchored estimate can overshoot by at most one month once
            // day-of-month clamping is taken into account.
            if months > 0 && start.plus_months(months) > end {
                months -= 1;
            }
            let days = end.to_epoch_day() - start.plus_months(months).to_epoch_day();
            Period {
                years: (months / 12) as i32,
                months: (months % 12) as i32,
                days: days as i32,
            }
        } else {
            let mut months = 0i64;
            let mut running = start;
            loop {
                let next = running.minus_months(1);
                if next < end {
                    break;
                }
                running = next;
                months -= 1;
            }
            let days = end.to_epoch_day() - running.to_epoch_day();
            Period {
                years: (months / 12) as i32,
                months: (months % 12) as i32,
                days: days as i32,
            }
        }
    }

    /// Apply this period to a date: years, then months (clamping), then
    /// days.
    pub fn added_to(self, date: CivilDate) -> CivilDate {
        date.plus_months(i64::from(self.years) * 12 + i64::from(self.months))
            .plus_days(i64::from(self.days))
    }

    pub fn negated(self) -> Period {
        Period { years: -self.years, months: -self.months, days: -self.days }
    }

    pub fn is_zero(self) -> bool {
        self == Period::ZERO
    }
}

impl fmt::Display for Period {
    /// ISO 8601 period form, e.g. `P1Y2M3D`; zero is `P0D`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        if self.years != 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months != 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }
        Ok(())
    }
}

// ── Duration ────────────────────────────────────────────────────────────────

/// Exact signed elapsed time: seconds plus a nanosecond-of-second in
/// `[0, 999_999_999]`.
///
/// The sub-second part always counts forward from `seconds`, so -0.5s is
/// `{seconds: -1, nanosecond: 500_000_000}` — the same convention the
/// epoch-second math uses, which keeps normalization branch-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct Duration {
    seconds: i64,
    nanosecond: u32,
}

impl Duration {
    pub const ZERO: Duration = Duration { seconds: 0, nanosecond: 0 };

    pub fn from_seconds(seconds: i64) -> Duration {
        Duration { seconds, nanosecond: 0 }
    }

    /// Exact elapsed time from `start` to `end` (`end - start`).
    pub fn between(start: Instant, end: Instant) -> Duration {
        let mut seconds = end.seconds() - start.seconds();
        let mut nanos = i64::from(end.nanosecond()) - i64::from(start.nanosecond());
        if nanos < 0 {
            nanos += NANOS_PER_SECOND;
            seconds -= 1;
        }
        Duration { seconds, nanosecond: nanos as u32 }
    }

    pub fn seconds(self) -> i64 {
        self.seconds
    }

    pub fn nanosecond(self) -> u32 {
        self.nanosecond
    }

    pub fn is_zero(self) -> bool {
        self == Duration::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.seconds < 0
    }

    pub fn negated(self) -> Duration {
        if self.nanosecond == 0 {
            Duration { seconds: -self.seconds, nanosecond: 0 }
        } else {
            Duration {
                seconds: -self.seconds - 1,
                nanosecond: (NANOS_PER_SECOND as u32) - self.nanosecond,
            }
        }
    }

    /// Human-readable decomposition of the absolute duration, e.g.
    /// "2 days, 3 hours, 15 minutes".
    pub fn human_readable(self) -> String {
        let total = if self.is_negative() { self.negated() } else { self };
        let abs = total.seconds;
        let days = abs / 86_400;
        let hours = abs % 86_400 / 3600;
        let minutes = abs % 3600 / 60;
        let seconds = abs % 60;

        let mut parts = Vec::new();
        if days > 0 {
            parts.push(format!("{} day{}", days, if days == 1 { "" } else { "s" }));
        }
        if hours > 0 {
            parts.push(format!("{} hour{}", hours, if hours == 1 { "" } else { "s" }));
        }
        if minutes > 0 {
            parts.push(format!(
                "{} minute{}",
                minutes,
                if minutes == 1 { "" } else { "s" }
            ));
        }
        if seconds > 0 || parts.is_empty() {
            parts.push(format!(
                "{} second{}",
                seconds,
                if seconds == 1 { "" } else { "s" }
            ));
        }
        parts.join(", ")
    }
}

impl fmt::Display for Duration {
    /// ISO 8601 seconds form, e.g. `PT3600S` or `PT-0.5S`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanosecond == 0 {
            return write!(f, "PT{}S", self.seconds);
        }
        // Render as one signed decimal.
        let total = i128::from(self.seconds) * i128::from(NANOS_PER_SECOND)
            + i128::from(self.nanosecond);
        let sign = if total < 0 { "-" } else { "" };
        let abs = total.unsigned_abs();
        let whole = abs / NANOS_PER_SECOND as u128;
        let frac = format!("{:09}", abs % NANOS_PER_SECOND as u128);
        write!(f, "PT{sign}{whole}.{}S", frac.trim_end_matches('0'))
    }
}

// ── Exact whole-unit counts ─────────────────────────────────────────────────

/// Calendar and clock units for truncating whole-unit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Nanos,
}

/// Truncating count of whole `unit`s from `start` to `end`.
///
/// Variable-length units (months, years) are counted by advancing `start`
/// by the unit and checking against `end` — never by dividing elapsed
/// seconds by a fixed unit length, which would miscount across unequal
/// months. Fixed-length units are exact integer math on the nanosecond
/// time line (a `LocalDateTime` day is always 24h; zone effects belong to
/// the zoned layer).
pub fn units_between(start: LocalDateTime, end: LocalDateTime, unit: Unit) -> i64 {
    match unit {
        Unit::Years => months_between(start, end) / 12,
        Unit::Months => months_between(start, end),
        Unit::Weeks => (exact_nanos_between(start, end) / (7 * NANOS_PER_DAY)) as i64,
        Unit::Days => (exact_nanos_between(start, end) / NANOS_PER_DAY) as i64,
        Unit::Hours => (exact_nanos_between(start, end) / (3600 * NANOS_PER_SECOND as i128)) as i64,
        Unit::Minutes => (exact_nanos_between(start, end) / (60 * NANOS_PER_SECOND as i128)) as i64,
        Unit::Seconds => (exact_nanos_between(start, end) / NANOS_PER_SECOND as i128) as i64,
        Unit::Nanos => exact_nanos_between(start, end) as i64,
    }
}

/// Date-only convenience: both dates are taken at midnight.
pub fn units_between_dates(start: CivilDate, end: CivilDate, unit: Unit) -> i64 {
    units_between(
        LocalDateTime::at_midnight(start),
        LocalDateTime::at_midnight(end),
        unit,
    )
}

fn exact_nanos_between(start: LocalDateTime, end: LocalDateTime) -> i128 {
    end.epoch_nano_assuming_utc() - start.epoch_nano_assuming_utc()
}

/// Whole months by advance-and-bracket, clamping-aware.
fn months_between(start: LocalDateTime, end: LocalDateTime) -> i64 {
    let mut months = end.date().proleptic_month() - start.date().proleptic_month();
    if months > 0 {
        while months > 0 && start.plus_months(months) > end {
            months -= 1;
        }
    } else {
        while months < 0 && start.plus_months(months) < end {
            months += 1;
        }
    }
    months
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::ClockTime;

    fn d(y: i32, m: u8, day: u8) -> CivilDate {
        CivilDate::new(y, m, day).unwrap()
    }

    fn dt(y: i32, mo: u8, day: u8, h: u8, mi: u8, s: u8) -> LocalDateTime {
        LocalDateTime::new(d(y, mo, day), ClockTime::new(h, mi, s, 0).unwrap())
    }

    // ── Period tests ─────────────────────────────────────────────────────

    #[test]
    fn test_period_simple_forward() {
        assert_eq!(Period::between(d(2014, 1, 14), d(2014, 3, 13)), Period::new(0, 1, 27));
        assert_eq!(Period::between(d(2010, 1, 14), d(2014, 1, 14)), Period::new(4, 0, 0));
        assert_eq!(Period::between(d(2014, 1, 14), d(2014, 1, 14)), Period::ZERO);
    }

    #[test]
    fn test_period_month_end_asymmetry() {
        // The documented asymmetry: forward is two whole months...
        let forward = Period::between(d(2020, 1, 31), d(2020, 3, 31));
        assert_eq!(forward, Period::new(0, 2, 0));

        // ...but the reverse is NOT the naive negation: one month back
        // from 2020-03-31 clamps to 2020-02-29, leaving 29 days.
        let reverse = Period::between(d(2020, 3, 31), d(2020, 1, 31));
        assert_eq!(reverse, Period::new(0, -1, -29));
        assert_ne!(reverse, forward.negated());
    }

    #[test]
    fn test_period_sign_matches_direction() {
        let p = Period::between(d(2014, 3, 13), d(2014, 1, 14));
        assert!(p.months < 0 || p.days < 0);
        // One month back from 2014-03-13 is 2014-02-13, 30 days past Jan 14.
        assert_eq!(p, Period::new(0, -1, -30));
    }

    #[test]
    fn test_period_day_borrowing_is_month_length_aware() {
        // Jan 31 -> Mar 1: one month lands on Feb 29 (2020) or Feb 28
        // (2021), the clamped month end, one day short of Mar 1 either way.
        assert_eq!(Period::between(d(2020, 1, 31), d(2020, 3, 1)), Period::new(0, 1, 1));
        assert_eq!(Period::between(d(2021, 1, 31), d(2021, 3, 1)), Period::new(0, 1, 1));
    }

    #[test]
    fn test_period_backward_steps_clamp_cumulatively() {
        // Each backward step clamps from the running date: 2020-05-31 ->
        // 2020-04-30 -> 2020-03-30 -> 2020-02-29, then 2020-01-29 would
        // overshoot 2020-01-31.
        assert_eq!(
            Period::between(d(2020, 5, 31), d(2020, 1, 31)),
            Period::new(0, -3, -29)
        );
        // A backward step landing exactly on the end leaves zero days.
        assert_eq!(
            Period::between(d(2014, 3, 13), d(2014, 2, 13)),
            Period::new(0, -1, 0)
        );
    }

    #[test]
    fn test_period_reverse_reconstructs_end() {
        let start = d(2020, 3, 31);
        let end = d(2020, 1, 31);
        let reverse = Period::between(start, end);
        assert_eq!(reverse, Period::new(0, -1, -29));
        assert_eq!(reverse.added_to(start), end);
    }

    #[test]
    fn test_period_added_to_matches_between_forward() {
        let start = d(2014, 1, 14);
        let end = d(2016, 3, 1);
        assert_eq!(Period::between(start, end).added_to(start), end);
    }

    #[test]
    fn test_period_display() {
        assert_eq!(Period::new(1, 2, 3).to_string(), "P1Y2M3D");
        assert_eq!(Period::new(0, -1, -29).to_string(), "P-1M-29D");
        assert_eq!(Period::ZERO.to_string(), "P0D");
    }

    // ── Duration tests ───────────────────────────────────────────────────

    #[test]
    fn test_duration_between_instants() {
        let start = Instant::from_epoch_second(1_000);
        let end = Instant::from_epoch_second(29_800);
        assert_eq!(Duration::between(start, end), Duration::from_seconds(28_800));
        assert_eq!(Duration::between(end, start), Duration::from_seconds(-28_800));
    }

    #[test]
    fn test_duration_nanosecond_borrow() {
        let start = Instant::new(10, 800_000_000).unwrap();
        let end = Instant::new(12, 200_000_000).unwrap();
        let dur = Duration::between(start, end);
        assert_eq!(dur.seconds(), 1);
        assert_eq!(dur.nanosecond(), 400_000_000);

        let back = Duration::between(end, start);
        assert_eq!(back, dur.negated());
        assert_eq!(back.seconds(), -2);
        assert_eq!(back.nanosecond(), 600_000_000);
        assert!(back.is_negative());
    }

    #[test]
    fn test_duration_human_readable() {
        let start = Instant::from_epoch_second(0);
        let end = Instant::from_epoch_second(2 * 86_400 + 3 * 3600 + 15 * 60);
        assert_eq!(
            Duration::between(start, end).human_readable(),
            "2 days, 3 hours, 15 minutes"
        );
        assert_eq!(Duration::ZERO.human_readable(), "0 seconds");
        assert_eq!(Duration::from_seconds(1).human_readable(), "1 second");
        // Decomposition of a negative duration reports the absolute value.
        assert_eq!(Duration::from_seconds(-90).human_readable(), "1 minute, 30 seconds");
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(Duration::from_seconds(3600).to_string(), "PT3600S");
        let half_back = Duration::from_seconds(0).negated();
        assert_eq!(half_back, Duration::ZERO);
        let minus_half = Duration::between(
            Instant::new(0, 500_000_000).unwrap(),
            Instant::from_epoch_second(0),
        );
        assert_eq!(minus_half.to_string(), "PT-0.5S");
    }

    // ── units_between tests ──────────────────────────────────────────────

    #[test]
    fn test_months_between_truncates() {
        // Jan 31 + 1 month clamps to Feb 29; + 2 months is Mar 31 which
        // overshoots Mar 30, so the count is 1, not 2.
        assert_eq!(units_between_dates(d(2020, 1, 31), d(2020, 3, 30), Unit::Months), 1);
        assert_eq!(units_between_dates(d(2020, 1, 31), d(2020, 3, 31), Unit::Months), 2);
    }

    #[test]
    fn test_months_between_respects_time_of_day() {
        // A month is only complete once the time of day is reached too.
        assert_eq!(
            units_between(dt(2020, 1, 15, 12, 0, 0), dt(2020, 2, 15, 11, 59, 59), Unit::Months),
            0
        );
        assert_eq!(
            units_between(dt(2020, 1, 15, 12, 0, 0), dt(2020, 2, 15, 12, 0, 0), Unit::Months),
            1
        );
    }

    #[test]
    fn test_years_between() {
        assert_eq!(units_between_dates(d(2010, 1, 14), d(2014, 1, 13), Unit::Years), 3);
        assert_eq!(units_between_dates(d(2010, 1, 14), d(2014, 1, 14), Unit::Years), 4);
        assert_eq!(units_between_dates(d(2014, 1, 14), d(2010, 1, 14), Unit::Years), -4);
    }

    #[test]
    fn test_fixed_units_between() {
        let start = dt(2026, 3, 13, 17, 0, 0);
        let end = dt(2026, 3, 16, 9, 0, 0);
        assert_eq!(units_between(start, end, Unit::Days), 2);
        assert_eq!(units_between(start, end, Unit::Hours), 64);
        assert_eq!(units_between(start, end, Unit::Minutes), 64 * 60);
        assert_eq!(units_between(start, end, Unit::Seconds), 64 * 3600);
        assert_eq!(units_between(end, start, Unit::Days), -2);
        assert_eq!(units_between_dates(d(2020, 10, 12), d(2020, 10, 26), Unit::Weeks), 2);
    }

    #[test]
    fn test_negative_months_between() {
        assert_eq!(units_between_dates(d(2020, 3, 30), d(2020, 1, 31), Unit::Months), -1);
        assert_eq!(units_between_dates(d(2020, 3, 31), d(2020, 1, 31), Unit::Months), -2);
    }
}
