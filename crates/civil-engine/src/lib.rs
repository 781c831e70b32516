//! # civil-engine
//!
//! Deterministic civil-calendar and timezone arithmetic.
//!
//! The engine models the proleptic Gregorian calendar, nanosecond clock
//! time, absolute instants, and zone-qualified datetimes, with explicit
//! gap/overlap resolution against per-zone transition tables derived from
//! the bundled IANA data. Every operation is a pure function of its
//! inputs; "now" only enters through an injectable [`Clock`].
//!
//! ## Modules
//!
//! - [`date`] — proleptic Gregorian dates, weekdays, month/year arithmetic
//! - [`time`] — nanosecond-resolution time of day with day-carry arithmetic
//! - [`datetime`] — date plus time of day, no zone attached
//! - [`offset`] — fixed UTC offsets
//! - [`tzdb`] — zone identifiers, transition tables, gap/overlap resolution
//! - [`zoned`] — instants, offset datetimes, zone-qualified datetimes
//! - [`diff`] — calendar periods, exact durations, single-unit differences
//! - [`adjust`] — date adjusters (month boundaries, nth weekday, weekday walks)
//! - [`fmt`] — pattern formatting/parsing and the ISO profiles
//! - [`error`] — error types

pub mod adjust;
pub mod date;
pub mod datetime;
pub mod diff;
pub mod error;
pub mod fmt;
pub mod offset;
pub mod time;
pub mod tzdb;
pub mod zoned;

pub use adjust::{adjust, Adjuster, DateAdjuster};
pub use date::{CivilDate, MonthDay, Weekday, YearMonth};
pub use datetime::LocalDateTime;
pub use diff::{units_between, units_between_dates, Duration, Period, Unit};
pub use error::{CivilError, Result};
pub use fmt::{
    date_from_iso_week, format_iso_zoned, iso_week_of_year, iso_weeks_in_year, parse_iso_zoned,
    IsoProfile, Pattern,
};
pub use offset::UtcOffset;
pub use time::ClockTime;
pub use tzdb::{LocalResolution, OverlapPreference, Transition, TzDatabase, ZoneId, ZoneTable};
pub use zoned::{Clock, FixedClock, Instant, OffsetDateTime, SystemClock, ZonedDateTime};
