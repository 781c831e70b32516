//! Adjuster engine: pure `date -> date` rules.
//!
//! An adjuster is anything implementing [`Adjuster`]; the trait is
//! blanket-implemented for closures, so built-in rules and caller-defined
//! ones compose uniformly — "last day of next month" is ordinary function
//! composition, not a special case.

use crate::date::{CivilDate, Weekday};
use crate::error::{CivilError, Result};

/// A pure rule mapping a date to a canonically adjusted date.
pub trait Adjuster {
    fn adjust(&self, date: CivilDate) -> Result<CivilDate>;
}

impl<F> Adjuster for F
where
    F: Fn(CivilDate) -> Result<CivilDate>,
{
    fn adjust(&self, date: CivilDate) -> Result<CivilDate> {
        self(date)
    }
}

impl CivilDate {
    /// Apply an adjuster to this date.
    ///
    /// # Examples
    ///
    /// ```
    /// use civil_engine::{CivilDate, DateAdjuster};
    ///
    /// let date = CivilDate::new(2019, 2, 9).unwrap();
    /// let last = date.with(&DateAdjuster::LastDayOfMonth).unwrap();
    /// assert_eq!(last, CivilDate::new(2019, 2, 28).unwrap());
    /// ```
    pub fn with<A: Adjuster + ?Sized>(self, adjuster: &A) -> Result<CivilDate> {
        adjuster.adjust(self)
    }
}

/// The built-in adjusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAdjuster {
    FirstDayOfMonth,
    LastDayOfMonth,
    FirstDayOfNextMonth,
    FirstDayOfYear,
    LastDayOfYear,
    FirstDayOfNextYear,
    /// The nth occurrence of a weekday within the date's month. Negative
    /// `n` counts from the month end (-1 = last).
    NthWeekdayInMonth { weekday: Weekday, n: i32 },
    /// The next date strictly after the input with the given weekday.
    Next(Weekday),
    /// As [`DateAdjuster::Next`], but the input itself qualifies.
    NextOrSame(Weekday),
    /// The last date strictly before the input with the given weekday.
    Previous(Weekday),
    /// As [`DateAdjuster::Previous`], but the input itself qualifies.
    PreviousOrSame(Weekday),
}

impl DateAdjuster {
    /// Look up a built-in adjuster by its external name.
    ///
    /// `"nthWeekday"` needs both parameters, the weekday-walk names need
    /// `weekday`; the day-of-month/year names take none.
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::InvalidAdjustment`] for unknown names or
    /// missing parameters.
    pub fn by_name(name: &str, weekday: Option<Weekday>, n: Option<i32>) -> Result<DateAdjuster> {
        let need_weekday = |weekday: Option<Weekday>| {
            weekday.ok_or_else(|| {
                CivilError::InvalidAdjustment(format!("'{name}' requires a weekday parameter"))
            })
        };
        match name {
            "firstDayOfMonth" => Ok(DateAdjuster::FirstDayOfMonth),
            "lastDayOfMonth" => Ok(DateAdjuster::LastDayOfMonth),
            "firstDayOfNextMonth" => Ok(DateAdjuster::FirstDayOfNextMonth),
            "firstDayOfYear" => Ok(DateAdjuster::FirstDayOfYear),
            "lastDayOfYear" => Ok(DateAdjuster::LastDayOfYear),
            "firstDayOfNextYear" => Ok(DateAdjuster::FirstDayOfNextYear),
            "nthWeekday" => Ok(DateAdjuster::NthWeekdayInMonth {
                weekday: need_weekday(weekday)?,
                n: n.ok_or_else(|| {
                    CivilError::InvalidAdjustment(
                        "'nthWeekday' requires an ordinal parameter".to_string(),
                    )
                })?,
            }),
            "next" => Ok(DateAdjuster::Next(need_weekday(weekday)?)),
            "nextOrSame" => Ok(DateAdjuster::NextOrSame(need_weekday(weekday)?)),
            "previous" => Ok(DateAdjuster::Previous(need_weekday(weekday)?)),
            "previousOrSame" => Ok(DateAdjuster::PreviousOrSame(need_weekday(weekday)?)),
            _ => Err(CivilError::InvalidAdjustment(format!(
                "unknown adjuster '{name}'"
            ))),
        }
    }
}

impl Adjuster for DateAdjuster {
    fn adjust(&self, date: CivilDate) -> Result<CivilDate> {
        match *self {
            DateAdjuster::FirstDayOfMonth => CivilDate::new(date.year(), date.month(), 1),
            DateAdjuster::LastDayOfMonth => {
                CivilDate::new(date.year(), date.month(), date.length_of_month())
            }
            DateAdjuster::FirstDayOfNextMonth => {
                Ok(CivilDate::new(date.year(), date.month(), 1)?.plus_months(1))
            }
            DateAdjuster::FirstDayOfYear => CivilDate::new(date.year(), 1, 1),
            DateAdjuster::LastDayOfYear => CivilDate::new(date.year(), 12, 31),
            DateAdjuster::FirstDayOfNextYear => CivilDate::new(date.year() + 1, 1, 1),
            DateAdjuster::NthWeekdayInMonth { weekday, n } => {
                nth_weekday_in_month(date.year(), date.month(), weekday, n)
            }
            DateAdjuster::Next(weekday) => Ok(walk_forward(date, weekday, false)),
            DateAdjuster::NextOrSame(weekday) => Ok(walk_forward(date, weekday, true)),
            DateAdjuster::Previous(weekday) => Ok(walk_backward(date, weekday, false)),
            DateAdjuster::PreviousOrSame(weekday) => Ok(walk_backward(date, weekday, true)),
        }
    }
}

/// Name-dispatch form of the adjuster engine, for callers working with
/// textual rule names.
pub fn adjust(
    date: CivilDate,
    name: &str,
    weekday: Option<Weekday>,
    n: Option<i32>,
) -> Result<CivilDate> {
    DateAdjuster::by_name(name, weekday, n)?.adjust(date)
}

/// The nth occurrence of `weekday` in the given month; negative `n`
/// counts from the month end.
fn nth_weekday_in_month(year: i32, month: u8, weekday: Weekday, n: i32) -> Result<CivilDate> {
    if n == 0 {
        return Err(CivilError::InvalidAdjustment(
            "weekday ordinal must be non-zero".to_string(),
        ));
    }
    let length = i32::from(CivilDate::days_in_month(year, month));
    let day = if n > 0 {
        let first = CivilDate::new(year, month, 1)?;
        let to_first_hit = (i32::from(weekday.days_from_monday()) + 7
            - i32::from(first.day_of_week().days_from_monday()))
            % 7;
        1 + to_first_hit + (n - 1) * 7
    } else {
        let last = CivilDate::new(year, month, length as u8)?;
        let from_last_hit = (i32::from(last.day_of_week().days_from_monday()) + 7
            - i32::from(weekday.days_from_monday()))
            % 7;
        length - from_last_hit + (n + 1) * 7
    };
    if day < 1 || day > length {
        return Err(CivilError::InvalidAdjustment(format!(
            "{year:04}-{month:02} has no occurrence {n} of {}",
            weekday.abbreviation()
        )));
    }
    CivilDate::new(year, month, day as u8)
}

fn walk_forward(date: CivilDate, weekday: Weekday, or_same: bool) -> CivilDate {
    let diff = i64::from(
        (weekday.days_from_monday() + 7 - date.day_of_week().days_from_monday()) % 7,
    );
    let diff = if diff == 0 && !or_same { 7 } else { diff };
    date.plus_days(diff)
}

fn walk_backward(date: CivilDate, weekday: Weekday, or_same: bool) -> CivilDate {
    let diff = i64::from(
        (date.day_of_week().days_from_monday() + 7 - weekday.days_from_monday()) % 7,
    );
    let diff = if diff == 0 && !or_same { 7 } else { diff };
    date.minus_days(diff)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u8, day: u8) -> CivilDate {
        CivilDate::new(y, m, day).unwrap()
    }

    // 2019-02-09 is the worked example throughout: a Saturday.
    fn base() -> CivilDate {
        d(2019, 2, 9)
    }

    #[test]
    fn test_month_and_year_boundaries() {
        assert_eq!(base().with(&DateAdjuster::FirstDayOfMonth).unwrap(), d(2019, 2, 1));
        assert_eq!(base().with(&DateAdjuster::LastDayOfMonth).unwrap(), d(2019, 2, 28));
        assert_eq!(base().with(&DateAdjuster::FirstDayOfNextMonth).unwrap(), d(2019, 3, 1));
        assert_eq!(base().with(&DateAdjuster::FirstDayOfYear).unwrap(), d(2019, 1, 1));
        assert_eq!(base().with(&DateAdjuster::LastDayOfYear).unwrap(), d(2019, 12, 31));
        assert_eq!(base().with(&DateAdjuster::FirstDayOfNextYear).unwrap(), d(2020, 1, 1));
        // Leap February
        assert_eq!(
            d(2020, 2, 9).with(&DateAdjuster::LastDayOfMonth).unwrap(),
            d(2020, 2, 29)
        );
    }

    #[test]
    fn test_nth_weekday_forward_and_backward() {
        let second_monday = DateAdjuster::NthWeekdayInMonth { weekday: Weekday::Monday, n: 2 };
        assert_eq!(base().with(&second_monday).unwrap(), d(2019, 2, 11));

        let second_to_last_monday =
            DateAdjuster::NthWeekdayInMonth { weekday: Weekday::Monday, n: -2 };
        assert_eq!(base().with(&second_to_last_monday).unwrap(), d(2019, 2, 18));

        let last_friday = DateAdjuster::NthWeekdayInMonth { weekday: Weekday::Friday, n: -1 };
        assert_eq!(base().with(&last_friday).unwrap(), d(2019, 2, 22));
    }

    #[test]
    fn test_nth_weekday_out_of_range() {
        // February 2019 has four Mondays.
        let fifth = DateAdjuster::NthWeekdayInMonth { weekday: Weekday::Monday, n: 5 };
        assert!(matches!(
            base().with(&fifth).unwrap_err(),
            CivilError::InvalidAdjustment(_)
        ));
        let zeroth = DateAdjuster::NthWeekdayInMonth { weekday: Weekday::Monday, n: 0 };
        assert!(base().with(&zeroth).is_err());
        let minus_fifth = DateAdjuster::NthWeekdayInMonth { weekday: Weekday::Monday, n: -5 };
        assert!(base().with(&minus_fifth).is_err());
        // But a 31-day month with five Fridays accepts n = 5.
        let fifth_friday = DateAdjuster::NthWeekdayInMonth { weekday: Weekday::Friday, n: 5 };
        assert_eq!(d(2019, 3, 1).with(&fifth_friday).unwrap(), d(2019, 3, 29));
    }

    #[test]
    fn test_next_and_previous_are_strict() {
        // 2019-02-09 is a Saturday.
        assert_eq!(base().with(&DateAdjuster::Next(Weekday::Saturday)).unwrap(), d(2019, 2, 16));
        assert_eq!(base().with(&DateAdjuster::NextOrSame(Weekday::Saturday)).unwrap(), base());
        assert_eq!(
            base().with(&DateAdjuster::Previous(Weekday::Saturday)).unwrap(),
            d(2019, 2, 2)
        );
        assert_eq!(
            base().with(&DateAdjuster::PreviousOrSame(Weekday::Saturday)).unwrap(),
            base()
        );
        assert_eq!(base().with(&DateAdjuster::Next(Weekday::Monday)).unwrap(), d(2019, 2, 11));
        assert_eq!(
            base().with(&DateAdjuster::Previous(Weekday::Friday)).unwrap(),
            d(2019, 2, 8)
        );
    }

    #[test]
    fn test_name_dispatch() {
        assert_eq!(adjust(base(), "firstDayOfMonth", None, None).unwrap(), d(2019, 2, 1));
        assert_eq!(adjust(base(), "lastDayOfMonth", None, None).unwrap(), d(2019, 2, 28));
        assert_eq!(
            adjust(base(), "nthWeekday", Some(Weekday::Monday), Some(2)).unwrap(),
            d(2019, 2, 11)
        );
        assert_eq!(
            adjust(base(), "nthWeekday", Some(Weekday::Monday), Some(-2)).unwrap(),
            d(2019, 2, 18)
        );
        assert_eq!(
            adjust(base(), "next", Some(Weekday::Saturday), None).unwrap(),
            d(2019, 2, 16)
        );
    }

    #[test]
    fn test_name_dispatch_rejects_bad_input() {
        assert!(matches!(
            adjust(base(), "teleportToFriday", None, None).unwrap_err(),
            CivilError::InvalidAdjustment(_)
        ));
        assert!(adjust(base(), "nthWeekday", Some(Weekday::Monday), None).is_err());
        assert!(adjust(base(), "nthWeekday", None, Some(2)).is_err());
        assert!(adjust(base(), "next", None, None).is_err());
    }

    #[test]
    fn test_closures_compose_with_builtins() {
        // "Last day of next month" is composition, not a special case.
        let last_day_of_next_month = |date: CivilDate| {
            date.with(&DateAdjuster::FirstDayOfNextMonth)?
                .with(&DateAdjuster::LastDayOfMonth)
        };
        assert_eq!(base().with(&last_day_of_next_month).unwrap(), d(2019, 3, 31));
        assert_eq!(
            d(2020, 1, 15).with(&last_day_of_next_month).unwrap(),
            d(2020, 2, 29)
        );
    }
}
