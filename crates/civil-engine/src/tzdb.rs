//! Timezone rule resolver: maps (zone, local date-time) to a concrete UTC
//! offset, classifying gaps and overlaps around DST transitions.
//!
//! Each zone is an ordered table of `(instant, offset-before, offset-after)`
//! records. The tables are built once, at initialization, from the bundled
//! IANA dataset (`chrono-tz`): offsets are sampled at one-day granularity
//! over the coverage range and every change is bisected to the exact
//! transition second. After load the tables are read-only; every lookup is
//! a binary search and a pure function of its inputs — no wall-clock
//! access anywhere.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Offset as _, TimeZone as _};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::datetime::LocalDateTime;
use crate::error::{CivilError, Result};
use crate::offset::UtcOffset;
use crate::zoned::Instant;

/// Start of the default coverage range: 1970-01-01T00:00:00Z.
const DEFAULT_RANGE_START: i64 = 0;

/// End of the default coverage range: 2038-01-01T00:00:00Z.
const DEFAULT_RANGE_END: i64 = 2_145_916_800;

/// Sampling granularity when scanning the bundled dataset. No real zone
/// transitions twice within a day, so daily probes cannot miss a change.
const SAMPLE_STEP: i64 = 86_400;

/// Zones covered by [`TzDatabase::bundled`].
pub const DEFAULT_ZONES: [&str; 8] = [
    "America/New_York",
    "America/Los_Angeles",
    "America/Sao_Paulo",
    "Europe/London",
    "Europe/Paris",
    "Asia/Shanghai",
    "Asia/Tokyo",
    "Australia/Sydney",
];

// ── ZoneId ──────────────────────────────────────────────────────────────────

/// An opaque identifier naming a transition-rule table: either an IANA
/// region/city key (resolved against a [`TzDatabase`]) or a fixed-offset
/// literal (`Z`, `UTC`, `+05:30`) that never needs a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneId {
    name: String,
    fixed: Option<UtcOffset>,
}

impl ZoneId {
    /// A zone id from its textual key.
    ///
    /// Fixed-offset literals are parsed eagerly (and fail here if
    /// malformed); region keys are validated later, against the database
    /// they are resolved with.
    pub fn new(name: &str) -> Result<ZoneId> {
        if name == "UTC" || name == "Z" || name == "z" {
            return Ok(ZoneId { name: name.to_string(), fixed: Some(UtcOffset::UTC) });
        }
        if name.starts_with('+') || name.starts_with('-') {
            let offset = UtcOffset::parse(name)?;
            return Ok(ZoneId { name: name.to_string(), fixed: Some(offset) });
        }
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+'))
        {
            return Err(CivilError::UnknownZone(format!("'{name}'")));
        }
        Ok(ZoneId { name: name.to_string(), fixed: None })
    }

    /// A zone id pinned to a literal offset.
    pub fn fixed(offset: UtcOffset) -> ZoneId {
        ZoneId { name: offset.to_string(), fixed: Some(offset) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The literal offset, when this id does not name a rule table.
    pub fn fixed_offset(&self) -> Option<UtcOffset> {
        self.fixed
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for ZoneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

// ── Transition table ────────────────────────────────────────────────────────

/// One offset change: at instant `at`, the zone's offset switches from
/// `offset_before` to `offset_after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Epoch second at which the new offset takes effect.
    pub at: i64,
    pub offset_before: UtcOffset,
    pub offset_after: UtcOffset,
}

/// How a local date-time relates to a zone's transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocalResolution {
    /// Exactly one offset applies.
    Unique(UtcOffset),
    /// The local time was skipped by a forward transition (spring-forward);
    /// it never occurred.
    Gap { before: UtcOffset, after: UtcOffset },
    /// The local time occurred twice around a backward transition
    /// (fall-back).
    Overlap { earlier: UtcOffset, later: UtcOffset },
}

/// Which occurrence to pick when a local time falls in an overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OverlapPreference {
    /// The first occurrence, under the pre-transition offset.
    #[default]
    Earlier,
    /// The repeated occurrence, under the post-transition offset.
    Later,
}

/// The ordered transition records of one zone.
#[derive(Debug, Clone)]
pub struct ZoneTable {
    name: String,
    /// Offset in force before the first recorded transition.
    initial: UtcOffset,
    transitions: Vec<Transition>,
}

impl ZoneTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The offset in force at an absolute instant (reverse lookup).
    pub fn offset_at(&self, instant: Instant) -> UtcOffset {
        let idx = self.transitions.partition_point(|t| t.at <= instant.seconds());
        if idx == 0 {
            self.initial
        } else {
            self.transitions[idx - 1].offset_after
        }
    }

    /// Classify a local date-time against this table.
    ///
    /// Around a transition at instant `T` with offsets `b` → `a`, the wall
    /// clock jumps from `T + b` to `T + a`: local readings inside
    /// `[T + min(b,a), T + max(b,a))` are either skipped (gap, `a > b`) or
    /// repeated (overlap, `a < b`). Everything else maps to exactly one
    /// offset. Binary search over the ordered table, O(log k).
    pub fn resolve(&self, local: LocalDateTime) -> LocalResolution {
        let wall = local.epoch_second_assuming_utc();
        let idx = self.transitions.partition_point(|t| {
            let lo = t.offset_before.seconds().min(t.offset_after.seconds());
            t.at + i64::from(lo) <= wall
        });
        if idx == 0 {
            return LocalResolution::Unique(self.initial);
        }
        let t = self.transitions[idx - 1];
        let before = i64::from(t.offset_before.seconds());
        let after = i64::from(t.offset_after.seconds());
        if wall >= t.at + before.max(after) {
            LocalResolution::Unique(t.offset_after)
        } else if after > before {
            LocalResolution::Gap { before: t.offset_before, after: t.offset_after }
        } else {
            LocalResolution::Overlap { earlier: t.offset_before, later: t.offset_after }
        }
    }
}

// ── TzDatabase ──────────────────────────────────────────────────────────────

/// Immutable collection of per-zone transition tables.
///
/// Built once (see [`TzDatabase::bundled`] for the process-wide instance);
/// all lookups take `&self` and are safe for unrestricted concurrent use.
#[derive(Debug)]
pub struct TzDatabase {
    zones: HashMap<String, ZoneTable>,
}

impl TzDatabase {
    /// The process-wide database over [`DEFAULT_ZONES`], built on first
    /// use and read-only thereafter.
    pub fn bundled() -> &'static TzDatabase {
        static BUNDLED: OnceLock<TzDatabase> = OnceLock::new();
        BUNDLED.get_or_init(|| {
            TzDatabase::with_zones(&DEFAULT_ZONES)
                .expect("bundled zone names exist in the IANA dataset")
        })
    }

    /// Build tables for the given IANA zone names over the default
    /// coverage range (1970-01-01 to 2038-01-01).
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::UnknownZone`] for names absent from the
    /// bundled dataset.
    pub fn with_zones(names: &[&str]) -> Result<TzDatabase> {
        TzDatabase::with_zones_and_range(names, DEFAULT_RANGE_START, DEFAULT_RANGE_END)
    }

    /// Build tables over a custom `[start, end]` epoch-second range.
    pub fn with_zones_and_range(names: &[&str], start: i64, end: i64) -> Result<TzDatabase> {
        let mut zones = HashMap::with_capacity(names.len());
        for name in names {
            let tz: Tz = name
                .parse()
                .map_err(|_| CivilError::UnknownZone(format!("'{name}'")))?;
            zones.insert(name.to_string(), build_table(name, tz, start, end));
        }
        Ok(TzDatabase { zones })
    }

    /// The transition table for a region key.
    pub fn table(&self, name: &str) -> Result<&ZoneTable> {
        self.zones
            .get(name)
            .ok_or_else(|| CivilError::UnknownZone(format!("'{name}'")))
    }

    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    /// Classify a local date-time in a zone. Fixed-offset ids resolve
    /// uniquely without any table.
    pub fn resolve_local(&self, zone: &ZoneId, local: LocalDateTime) -> Result<LocalResolution> {
        match zone.fixed_offset() {
            Some(offset) => Ok(LocalResolution::Unique(offset)),
            None => Ok(self.table(zone.name())?.resolve(local)),
        }
    }

    /// Resolve a local date-time to the offset (and possibly adjusted
    /// local time) that the engine's policy dictates.
    ///
    /// - Gap: the input never occurred; shift it forward by the gap length
    ///   and use the post-transition offset.
    /// - Overlap: use the earlier offset unless `preference` asks for the
    ///   later one.
    pub fn resolve_offset(
        &self,
        zone: &ZoneId,
        local: LocalDateTime,
        preference: OverlapPreference,
    ) -> Result<(LocalDateTime, UtcOffset)> {
        match self.resolve_local(zone, local)? {
            LocalResolution::Unique(offset) => Ok((local, offset)),
            LocalResolution::Gap { before, after } => {
                let gap = i64::from(after.seconds() - before.seconds());
                Ok((local.plus_seconds(gap), after))
            }
            LocalResolution::Overlap { earlier, later } => {
                let offset = match preference {
                    OverlapPreference::Earlier => earlier,
                    OverlapPreference::Later => later,
                };
                Ok((local, offset))
            }
        }
    }

    /// The offset in force at an absolute instant.
    pub fn offset_at(&self, zone: &ZoneId, instant: Instant) -> Result<UtcOffset> {
        match zone.fixed_offset() {
            Some(offset) => Ok(offset),
            None => Ok(self.table(zone.name())?.offset_at(instant)),
        }
    }
}

/// Sample the bundled dataset for one zone and bisect each offset change
/// to the exact second.
fn build_table(name: &str, tz: Tz, start: i64, end: i64) -> ZoneTable {
    let initial = probe(tz, start);
    let mut transitions = Vec::new();
    let mut prev = initial;
    let mut at = start + SAMPLE_STEP;
    while at <= end {
        let current = probe(tz, at);
        if current != prev {
            let exact = bisect_change(tz, at - SAMPLE_STEP, at, prev);
            transitions.push(Transition {
                at: exact,
                offset_before: prev,
                offset_after: current,
            });
            prev = current;
        }
        at += SAMPLE_STEP;
    }
    ZoneTable { name: name.to_string(), initial, transitions }
}

/// Narrow an offset change inside `(lo, hi]` down to the first second with
/// the new offset.
fn bisect_change(tz: Tz, mut lo: i64, mut hi: i64, offset_before: UtcOffset) -> i64 {
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if probe(tz, mid) == offset_before {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

/// The dataset's offset at an epoch second.
fn probe(tz: Tz, at: i64) -> UtcOffset {
    let utc = DateTime::from_timestamp(at, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default();
    UtcOffset::from_seconds_unchecked(tz.offset_from_utc_datetime(&utc).fix().local_minus_utc())
}

// ── Tests ───────────────────────────────────────────────────────────────────
