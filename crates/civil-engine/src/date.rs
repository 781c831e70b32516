//! Civil calendar model: proleptic Gregorian dates and pure date math.
//!
//! [`CivilDate`] is an immutable year/month/day triple. Construction
//! validates the fields; arithmetic never fails — month arithmetic clamps
//! the day to the target month's length (Jan 31 + 1 month = Feb 28/29),
//! and day arithmetic goes through a monotonic epoch-day encoding so it is
//! O(1) and drift-free for any step size.

use std::fmt;

use serde::Serialize;

use crate::error::{CivilError, Result};

/// Days from 0000-03-01 to 1970-01-01 in the proleptic Gregorian calendar.
const EPOCH_SHIFT: i64 = 719_468;

/// Days in one 400-year Gregorian cycle.
const DAYS_PER_CYCLE: i64 = 146_097;

// ── Weekday ─────────────────────────────────────────────────────────────────

/// A day of the week with ISO 8601 numbering (Monday = 1 .. Sunday = 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in ISO order, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// ISO 8601 number: Monday = 1 .. Sunday = 7.
    pub fn iso_number(self) -> u8 {
        self.days_from_monday() + 1
    }

    /// Days since Monday: Monday = 0 .. Sunday = 6.
    pub fn days_from_monday(self) -> u8 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    /// Weekday from an ISO 8601 number (1-7).
    pub fn from_iso_number(n: u8) -> Result<Weekday> {
        match n {
            1..=7 => Ok(Weekday::ALL[(n - 1) as usize]),
            _ => Err(CivilError::InvalidDate(format!(
                "weekday number must be 1-7, got {n}"
            ))),
        }
    }

    /// Canonical ISO English abbreviation ("Mon" .. "Sun").
    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }

    /// Weekday from its canonical abbreviation.
    pub fn from_abbreviation(s: &str) -> Option<Weekday> {
        Weekday::ALL.into_iter().find(|w| w.abbreviation() == s)
    }
}

// ── CivilDate ───────────────────────────────────────────────────────────────

/// A proleptic Gregorian calendar date.
///
/// The year may be zero or negative (proleptic). All mutators return a new
/// value; arithmetic never fails.
///
/// # Examples
///
/// ```
/// use civil_engine::CivilDate;
///
/// let date = CivilDate::new(2020, 1, 31).unwrap();
/// // Month arithmetic clamps to the target month's length.
/// assert_eq!(date.plus_months(1), CivilDate::new(2020, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CivilDate {
    year: i32,
    month: u8,
    day: u8,
}

impl CivilDate {
    /// Construct a date, validating month and day.
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::InvalidDate`] if `month` is outside 1-12 or
    /// `day` exceeds the month's length in `year`.
    pub fn new(year: i32, month: u8, day: u8) -> Result<CivilDate> {
        if !(1..=12).contains(&month) {
            return Err(CivilError::InvalidDate(format!(
                "month must be 1-12, got {month}"
            )));
        }
        let len = CivilDate::days_in_month(year, month);
        if day == 0 || day > len {
            return Err(CivilError::InvalidDate(format!(
                "day must be 1-{len} for {year:04}-{month:02}, got {day}"
            )));
        }
        Ok(CivilDate { year, month, day })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    /// Gregorian leap-year rule: divisible by 4, and not by 100 unless
    /// also by 400.
    pub fn is_leap_year(year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Number of days in the given month of the given year.
    pub fn days_in_month(year: i32, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if CivilDate::is_leap_year(year) => 29,
            _ => 28,
        }
    }

    /// Length of this date's month.
    pub fn length_of_month(self) -> u8 {
        CivilDate::days_in_month(self.year, self.month)
    }

    /// Days since 1970-01-01 (negative for earlier dates).
    ///
    /// This is the monotonic encoding all day-level arithmetic goes
    /// through; it inverts exactly via [`CivilDate::from_epoch_day`].
    pub fn to_epoch_day(self) -> i64 {
        let y = i64::from(self.year) - i64::from(self.month <= 2);
        let era = if y >= 0 { y } else { y - 399 } / 400;
        let yoe = y - era * 400;
        let m = i64::from(self.month);
        let doy = (153 * (m + if m > 2 { -3 } else { 9 }) + 2) / 5 + i64::from(self.day) - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * DAYS_PER_CYCLE + doe - EPOCH_SHIFT
    }

    /// Inverse of [`CivilDate::to_epoch_day`].
    pub fn from_epoch_day(epoch_day: i64) -> CivilDate {
        let z = epoch_day + EPOCH_SHIFT;
        let era = if z >= 0 { z } else { z - (DAYS_PER_CYCLE - 1) } / DAYS_PER_CYCLE;
        let doe = z - era * DAYS_PER_CYCLE;
        let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
        let y = yoe + era * 400;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = (y + i64::from(month <= 2)) as i32;
        CivilDate { year, month, day }
    }

    /// Day of the week, derived from the epoch-day encoding
    /// (1970-01-01 was a Thursday).
    pub fn day_of_week(self) -> Weekday {
        let idx = (self.to_epoch_day() + 3).rem_euclid(7) as usize;
        Weekday::ALL[idx]
    }

    /// Ordinal day of the year (1-365/366).
    pub fn day_of_year(self) -> u16 {
        const CUMULATIVE: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
        let mut doy = CUMULATIVE[(self.month - 1) as usize] + u16::from(self.day);
        if self.month > 2 && CivilDate::is_leap_year(self.year) {
            doy += 1;
        }
        doy
    }

    /// Date from year and ordinal day of year.
    pub fn from_year_day(year: i32, day_of_year: u16) -> Result<CivilDate> {
        let max = if CivilDate::is_leap_year(year) { 366 } else { 365 };
        if day_of_year == 0 || day_of_year > max {
            return Err(CivilError::InvalidDate(format!(
                "day of year must be 1-{max} for {year}, got {day_of_year}"
            )));
        }
        let jan1 = CivilDate { year, month: 1, day: 1 };
        Ok(CivilDate::from_epoch_day(
            jan1.to_epoch_day() + i64::from(day_of_year) - 1,
        ))
    }

    /// Add a number of days (may be negative). Exact, never clamps.
    pub fn plus_days(self, days: i64) -> CivilDate {
        CivilDate::from_epoch_day(self.to_epoch_day() + days)
    }

    /// Add whole weeks.
    pub fn plus_weeks(self, weeks: i64) -> CivilDate {
        self.plus_days(weeks * 7)
    }

    /// Add months, clamping the day to the resulting month's length.
    ///
    /// Jan 31 + 1 month is the last day of February, not an error and not
    /// a rollover into March.
    pub fn plus_months(self, months: i64) -> CivilDate {
        let total = self.proleptic_month() + months;
        let year = total.div_euclid(12) as i32;
        let month = (total.rem_euclid(12) + 1) as u8;
        let day = self.day.min(CivilDate::days_in_month(year, month));
        CivilDate { year, month, day }
    }

    /// Add years, clamping Feb 29 to Feb 28 in non-leap targets.
    pub fn plus_years(self, years: i64) -> CivilDate {
        self.plus_months(years * 12)
    }

    pub fn minus_days(self, days: i64) -> CivilDate {
        self.plus_days(-days)
    }

    pub fn minus_months(self, months: i64) -> CivilDate {
        self.plus_months(-months)
    }

    pub fn minus_years(self, years: i64) -> CivilDate {
        self.plus_years(-years)
    }

    /// Months since month 0 of year 0; the units_between/period math keys
    /// off this.
    pub(crate) fn proleptic_month(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for CivilDate {
    /// Extended ISO form, `YYYY-MM-DD`, with a leading `-` for negative years.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}-{:02}", -i64::from(self.year), self.month, self.day)
        } else {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }
}

// ── MonthDay / YearMonth ────────────────────────────────────────────────────

/// A month/day pair without a year, ordered calendar-wise.
///
/// Useful for recurring annual dates (birthdays, fiscal marks). Day 29 in
/// February is allowed since some year makes it valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthDay {
    month: u8,
    day: u8,
}

impl MonthDay {
    pub fn new(month: u8, day: u8) -> Result<MonthDay> {
        if !(1..=12).contains(&month) {
            return Err(CivilError::InvalidDate(format!(
                "month must be 1-12, got {month}"
            )));
        }
        // Validate against the longest possible month (leap February for 2).
        let max = CivilDate::days_in_month(2000, month);
        if day == 0 || day > max {
            return Err(CivilError::InvalidDate(format!(
                "day must be 1-{max} for month {month}, got {day}"
            )));
        }
        Ok(MonthDay { month, day })
    }

    pub fn from_date(date: CivilDate) -> MonthDay {
        MonthDay { month: date.month(), day: date.day() }
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }
}

/// A year/month pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Result<YearMonth> {
        if !(1..=12).contains(&month) {
            return Err(CivilError::InvalidDate(format!(
                "month must be 1-12, got {month}"
            )));
        }
        Ok(YearMonth { year, month })
    }

    pub fn from_date(date: CivilDate) -> YearMonth {
        YearMonth { year: date.year(), month: date.month() }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    /// Number of days in this month, leap-aware.
    pub fn length_of_month(self) -> u8 {
        CivilDate::days_in_month(self.year, self.month)
    }

    /// The date at a given day of this month.
    pub fn at_day(self, day: u8) -> Result<CivilDate> {
        CivilDate::new(self.year, self.month, day)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u8, day: u8) -> CivilDate {
        CivilDate::new(y, m, day).unwrap()
    }

    #[test]
    fn test_leap_year_century_rules() {
        assert!(!CivilDate::is_leap_year(1900));
        assert!(CivilDate::is_leap_year(2000));
        assert!(!CivilDate::is_leap_year(2100));
        assert!(CivilDate::is_leap_year(2020));
        assert!(!CivilDate::is_leap_year(2019));
        assert!(CivilDate::is_leap_year(0)); // year 0 is a leap year
        assert!(CivilDate::is_leap_year(-4));
    }

    #[test]
    fn test_leap_rule_full_range() {
        for year in -9999..=9999 {
            let expected = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
            assert_eq!(CivilDate::is_leap_year(year), expected, "year {year}");
            let feb = CivilDate::days_in_month(year, 2);
            assert_eq!(feb, if expected { 29 } else { 28 }, "year {year}");
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(CivilDate::days_in_month(2021, 1), 31);
        assert_eq!(CivilDate::days_in_month(2021, 4), 30);
        assert_eq!(CivilDate::days_in_month(2020, 2), 29);
        assert_eq!(CivilDate::days_in_month(2021, 2), 28);
    }

    #[test]
    fn test_construction_rejects_invalid() {
        assert!(CivilDate::new(2021, 0, 1).is_err());
        assert!(CivilDate::new(2021, 13, 1).is_err());
        assert!(CivilDate::new(2021, 2, 29).is_err());
        assert!(CivilDate::new(2021, 4, 31).is_err());
        assert!(CivilDate::new(2021, 4, 0).is_err());
        assert!(CivilDate::new(2020, 2, 29).is_ok());
    }

    #[test]
    fn test_epoch_day_known_values() {
        assert_eq!(d(1970, 1, 1).to_epoch_day(), 0);
        assert_eq!(d(1970, 1, 2).to_epoch_day(), 1);
        assert_eq!(d(1969, 12, 31).to_epoch_day(), -1);
        assert_eq!(d(2000, 1, 1).to_epoch_day(), 10957);
        assert_eq!(d(2020, 3, 1).to_epoch_day(), 18322);
    }

    #[test]
    fn test_day_of_week_known_values() {
        assert_eq!(d(1970, 1, 1).day_of_week(), Weekday::Thursday);
        assert_eq!(d(2020, 10, 12).day_of_week(), Weekday::Monday);
        assert_eq!(d(2019, 2, 9).day_of_week(), Weekday::Saturday);
        assert_eq!(d(1900, 1, 1).day_of_week(), Weekday::Monday);
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(d(2021, 1, 1).day_of_year(), 1);
        assert_eq!(d(2021, 12, 31).day_of_year(), 365);
        assert_eq!(d(2020, 12, 31).day_of_year(), 366);
        assert_eq!(d(2020, 3, 1).day_of_year(), 61);
        assert_eq!(d(2021, 3, 1).day_of_year(), 60);
    }

    #[test]
    fn test_from_year_day() {
        assert_eq!(CivilDate::from_year_day(2020, 61).unwrap(), d(2020, 3, 1));
        assert_eq!(CivilDate::from_year_day(2021, 365).unwrap(), d(2021, 12, 31));
        assert!(CivilDate::from_year_day(2021, 366).is_err());
        assert!(CivilDate::from_year_day(2021, 0).is_err());
    }

    #[test]
    fn test_plus_months_clamps_to_month_end() {
        assert_eq!(d(2020, 1, 31).plus_months(1), d(2020, 2, 29));
        assert_eq!(d(2021, 1, 31).plus_months(1), d(2021, 2, 28));
        assert_eq!(d(2021, 3, 31).plus_months(1), d(2021, 4, 30));
        // Crossing a year boundary backwards
        assert_eq!(d(2021, 1, 15).plus_months(-2), d(2020, 11, 15));
    }

    #[test]
    fn test_plus_years_clamps_leap_day() {
        assert_eq!(d(2020, 2, 29).plus_years(1), d(2021, 2, 28));
        assert_eq!(d(2020, 2, 29).plus_years(4), d(2024, 2, 29));
    }

    #[test]
    fn test_plus_days_crosses_boundaries() {
        assert_eq!(d(2020, 12, 31).plus_days(1), d(2021, 1, 1));
        assert_eq!(d(2020, 2, 28).plus_days(1), d(2020, 2, 29));
        assert_eq!(d(2020, 2, 28).plus_days(2), d(2020, 3, 1));
        assert_eq!(d(2021, 1, 1).minus_days(1), d(2020, 12, 31));
    }

    #[test]
    fn test_plus_weeks() {
        assert_eq!(d(2020, 10, 12).plus_weeks(1), d(2020, 10, 19));
        assert_eq!(d(2020, 10, 12).plus_weeks(-2), d(2020, 9, 28));
    }

    #[test]
    fn test_ordering() {
        assert!(d(2014, 1, 14) < d(2014, 1, 15));
        assert!(d(2014, 1, 14) < d(2014, 2, 1));
        assert!(d(-1, 12, 31) < d(0, 1, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(d(2014, 1, 16).to_string(), "2014-01-16");
        assert_eq!(d(-44, 3, 15).to_string(), "-0044-03-15");
        assert_eq!(d(0, 1, 1).to_string(), "0000-01-01");
    }

    #[test]
    fn test_month_day_ordering() {
        let birthday = MonthDay::new(1, 14).unwrap();
        let other = MonthDay::new(10, 12).unwrap();
        assert!(birthday < other);
        assert_eq!(MonthDay::from_date(d(2010, 1, 14)), birthday);
        assert!(MonthDay::new(2, 29).is_ok());
        assert!(MonthDay::new(2, 30).is_err());
    }

    #[test]
    fn test_year_month_length() {
        assert_eq!(YearMonth::new(2018, 2).unwrap().length_of_month(), 28);
        assert_eq!(YearMonth::new(2020, 2).unwrap().length_of_month(), 29);
        assert_eq!(YearMonth::new(2020, 2).unwrap().at_day(29).unwrap(), d(2020, 2, 29));
        assert!(YearMonth::new(2021, 2).unwrap().at_day(29).is_err());
    }

    proptest! {
        #[test]
        fn prop_epoch_day_round_trip(epoch_day in -3_000_000i64..3_000_000) {
            let date = CivilDate::from_epoch_day(epoch_day);
            prop_assert_eq!(date.to_epoch_day(), epoch_day);
        }

        #[test]
        fn prop_plus_days_round_trip(epoch_day in -1_000_000i64..1_000_000, n in -1_000_000i64..1_000_000) {
            let date = CivilDate::from_epoch_day(epoch_day);
            prop_assert_eq!(date.plus_days(n).plus_days(-n), date);
        }

        #[test]
        fn prop_epoch_day_is_monotonic(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let da = CivilDate::from_epoch_day(a);
            let db = CivilDate::from_epoch_day(b);
            prop_assert_eq!(a.cmp(&b), da.cmp(&db));
        }

        #[test]
        fn prop_successive_days_advance_weekday(epoch_day in -1_000_000i64..1_000_000) {
            let today = CivilDate::from_epoch_day(epoch_day);
            let tomorrow = today.plus_days(1);
            let expected = (today.day_of_week().days_from_monday() + 1) % 7;
            prop_assert_eq!(tomorrow.day_of_week().days_from_monday(), expected);
        }
    }
}
