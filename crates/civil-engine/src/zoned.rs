//! Instant and zoned conversion layer.
//!
//! [`Instant`] is the only representation with a total order independent
//! of any zone. [`OffsetDateTime`] pairs local fields with a literal
//! offset and needs no table; [`ZonedDateTime`] pairs them with a
//! [`ZoneId`](crate::ZoneId) and carries the offset the resolver derived —
//! the offset is never set directly and is re-derived whenever the local
//! fields or zone change.

use std::fmt;

use serde::Serialize;

use crate::datetime::LocalDateTime;
use crate::error::{CivilError, Result};
use crate::offset::UtcOffset;
use crate::time::NANOS_PER_SECOND;
use crate::tzdb::{OverlapPreference, TzDatabase, ZoneId};

// ── Instant ─────────────────────────────────────────────────────────────────

/// An absolute point on the universal time line: signed seconds since the
/// Unix epoch plus a nanosecond-of-second in `[0, 999_999_999]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Instant {
    seconds: i64,
    nanosecond: u32,
}

impl Instant {
    pub const UNIX_EPOCH: Instant = Instant { seconds: 0, nanosecond: 0 };

    /// An instant from epoch seconds and a nanosecond-of-second.
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::InvalidTime`] when `nanosecond` exceeds
    /// 999,999,999.
    pub fn new(seconds: i64, nanosecond: u32) -> Result<Instant> {
        if nanosecond > 999_999_999 {
            return Err(CivilError::InvalidTime(format!(
                "nanosecond must be 0-999999999, got {nanosecond}"
            )));
        }
        Ok(Instant { seconds, nanosecond })
    }

    pub fn from_epoch_second(seconds: i64) -> Instant {
        Instant { seconds, nanosecond: 0 }
    }

    pub fn from_epoch_milli(millis: i64) -> Instant {
        Instant {
            seconds: millis.div_euclid(1000),
            nanosecond: (millis.rem_euclid(1000) * 1_000_000) as u32,
        }
    }

    pub fn as_epoch_milli(self) -> i64 {
        self.seconds * 1000 + i64::from(self.nanosecond / 1_000_000)
    }

    pub fn seconds(self) -> i64 {
        self.seconds
    }

    pub fn nanosecond(self) -> u32 {
        self.nanosecond
    }

    pub fn plus_seconds(self, seconds: i64) -> Instant {
        Instant { seconds: self.seconds + seconds, nanosecond: self.nanosecond }
    }

    pub fn plus_nanos(self, nanos: i64) -> Instant {
        let total = i64::from(self.nanosecond) + nanos.rem_euclid(NANOS_PER_SECOND);
        let carry = nanos.div_euclid(NANOS_PER_SECOND) + total.div_euclid(NANOS_PER_SECOND);
        Instant {
            seconds: self.seconds + carry,
            nanosecond: total.rem_euclid(NANOS_PER_SECOND) as u32,
        }
    }
}

impl fmt::Display for Instant {
    /// The instant in UTC, extended ISO form with a `Z` suffix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = LocalDateTime::from_epoch_second_assuming_utc(self.seconds, self.nanosecond);
        write!(f, "{local}Z")
    }
}

// ── Clock capability ────────────────────────────────────────────────────────

/// An injectable source of the current instant.
///
/// The engine's arithmetic and conversions never read a clock themselves;
/// callers that need "now" pass one of these, which keeps every
/// computation a pure function of its inputs and testable without
/// wall-clock dependence.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Reads the system clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        let now = chrono::Utc::now();
        Instant {
            seconds: now.timestamp(),
            // chrono folds leap seconds into a nanos value >= 1e9.
            nanosecond: now.timestamp_subsec_nanos().min(999_999_999),
        }
    }
}

/// Always reports the same instant; for tests and replay.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.0
    }
}

// ── OffsetDateTime ──────────────────────────────────────────────────────────

/// Local fields plus a literal UTC offset: unambiguous, defines exactly
/// one instant, never consults a transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OffsetDateTime {
    local: LocalDateTime,
    offset: UtcOffset,
}

impl OffsetDateTime {
    pub fn new(local: LocalDateTime, offset: UtcOffset) -> OffsetDateTime {
        OffsetDateTime { local, offset }
    }

    pub fn local(self) -> LocalDateTime {
        self.local
    }

    pub fn offset(self) -> UtcOffset {
        self.offset
    }

    /// `local_seconds_since_epoch - offset_seconds`.
    pub fn to_instant(self) -> Instant {
        Instant {
            seconds: self.local.epoch_second_assuming_utc() - i64::from(self.offset.seconds()),
            nanosecond: self.local.time().nanosecond(),
        }
    }

    pub fn from_instant(instant: Instant, offset: UtcOffset) -> OffsetDateTime {
        let local = LocalDateTime::from_epoch_second_assuming_utc(
            instant.seconds() + i64::from(offset.seconds()),
            instant.nanosecond(),
        );
        OffsetDateTime { local, offset }
    }

    /// The same instant under a different literal offset.
    pub fn with_offset(self, offset: UtcOffset) -> OffsetDateTime {
        OffsetDateTime::from_instant(self.to_instant(), offset)
    }
}

impl fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.local, self.offset)
    }
}

// ── ZonedDateTime ───────────────────────────────────────────────────────────

/// Local fields qualified by a zone, with the offset the resolver derived.
///
/// Constructed only through the resolution functions, so the stored
/// offset always agrees with the zone's transition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZonedDateTime {
    local: LocalDateTime,
    zone: ZoneId,
    offset: UtcOffset,
}

impl ZonedDateTime {
    /// Interpret local fields in a zone with the default disambiguation
    /// (gap: shift forward; overlap: earlier offset).
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::UnknownZone`] if `zone` names a table the
    /// database does not hold.
    pub fn from_local(local: LocalDateTime, zone: ZoneId, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_local_with(local, zone, db, OverlapPreference::default())
    }

    /// As [`ZonedDateTime::from_local`], choosing which occurrence wins in
    /// an overlap.
    pub fn from_local_with(
        local: LocalDateTime,
        zone: ZoneId,
        db: &TzDatabase,
        preference: OverlapPreference,
    ) -> Result<ZonedDateTime> {
        let (resolved_local, offset) = db.resolve_offset(&zone, local, preference)?;
        Ok(ZonedDateTime { local: resolved_local, zone, offset })
    }

    /// The zone's reading of an absolute instant (reverse table lookup).
    pub fn from_instant(instant: Instant, zone: ZoneId, db: &TzDatabase) -> Result<ZonedDateTime> {
        let offset = db.offset_at(&zone, instant)?;
        let local = LocalDateTime::from_epoch_second_assuming_utc(
            instant.seconds() + i64::from(offset.seconds()),
            instant.nanosecond(),
        );
        Ok(ZonedDateTime { local, zone, offset })
    }

    pub fn local(&self) -> LocalDateTime {
        self.local
    }

    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    /// The derived offset; always consistent with the zone's table.
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn to_instant(&self) -> Instant {
        Instant {
            seconds: self.local.epoch_second_assuming_utc() - i64::from(self.offset.seconds()),
            nanosecond: self.local.time().nanosecond(),
        }
    }

    /// The same instant reinterpreted under a new zone (not the same local
    /// fields).
    pub fn with_zone(&self, zone: ZoneId, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_instant(self.to_instant(), zone, db)
    }

    /// The same local fields as an offset-date-time.
    pub fn to_offset_date_time(&self) -> OffsetDateTime {
        OffsetDateTime { local: self.local, offset: self.offset }
    }

    /// Day-level arithmetic keeps the wall-clock reading: the local fields
    /// move by whole calendar days and the offset is re-derived, so adding
    /// a day across a DST transition lands on the same local time, not
    /// +24h of elapsed time.
    pub fn plus_days(&self, days: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_local(self.local.plus_days(days), self.zone.clone(), db)
    }

    pub fn plus_weeks(&self, weeks: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        self.plus_days(weeks * 7, db)
    }

    pub fn plus_months(&self, months: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_local(self.local.plus_months(months), self.zone.clone(), db)
    }

    pub fn plus_years(&self, years: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_local(self.local.plus_years(years), self.zone.clone(), db)
    }

    /// Sub-day arithmetic is exact elapsed time: it moves the instant and
    /// re-reads the zone, so it tracks DST (22:00 + 4h can be 03:00).
    pub fn plus_hours(&self, hours: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        self.plus_seconds(hours * 3600, db)
    }

    pub fn plus_minutes(&self, minutes: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        self.plus_seconds(minutes * 60, db)
    }

    pub fn plus_seconds(&self, seconds: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_instant(self.to_instant().plus_seconds(seconds), self.zone.clone(), db)
    }

    /// Day-level counterparts, wall-clock preserving like `plus_days`.
    pub fn minus_days(&self, days: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_local(self.local.minus_days(days), self.zone.clone(), db)
    }

    pub fn minus_weeks(&self, weeks: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        self.minus_days(weeks * 7, db)
    }

    pub fn minus_months(&self, months: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_local(self.local.minus_months(months), self.zone.clone(), db)
    }

    pub fn minus_years(&self, years: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_local(self.local.minus_years(years), self.zone.clone(), db)
    }

    /// Sub-day counterparts, exact elapsed time like `plus_hours`.
    pub fn minus_hours(&self, hours: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        self.minus_seconds(hours * 3600, db)
    }

    pub fn minus_minutes(&self, minutes: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        self.minus_seconds(minutes * 60, db)
    }

    pub fn minus_seconds(&self, seconds: i64, db: &TzDatabase) -> Result<ZonedDateTime> {
        ZonedDateTime::from_instant(
            self.to_instant().plus_seconds(-seconds),
            self.zone.clone(),
            db,
        )
    }
}

impl fmt::Display for ZonedDateTime {
    /// Extended ISO form with the derived offset and bracketed zone id.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}[{}]", self.local, self.offset, self.zone)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
