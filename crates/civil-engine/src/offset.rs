//! Fixed UTC offsets.

use std::fmt;

use serde::Serialize;

use crate::error::{CivilError, Result};

/// A fixed offset from UTC in whole seconds, within ±18 hours.
///
/// 18 hours matches the widest offsets the IANA database has ever used
/// plus headroom, and is the conventional validity bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UtcOffset {
    seconds: i32,
}

impl UtcOffset {
    pub const UTC: UtcOffset = UtcOffset { seconds: 0 };

    const MAX_SECONDS: i32 = 18 * 3600;

    /// Offset from a signed number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::InvalidOffset`] outside ±18 hours.
    pub fn from_seconds(seconds: i32) -> Result<UtcOffset> {
        if seconds.abs() > Self::MAX_SECONDS {
            return Err(CivilError::InvalidOffset(format!(
                "offset must be within +/-18:00, got {seconds}s"
            )));
        }
        Ok(UtcOffset { seconds })
    }

    /// Offset from signed hour/minute parts; both carry the same sign.
    pub fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Result<UtcOffset> {
        UtcOffset::from_seconds(hours * 3600 + minutes * 60 + seconds)
    }

    /// In-range offsets coming out of the bundled dataset skip validation.
    pub(crate) fn from_seconds_unchecked(seconds: i32) -> UtcOffset {
        debug_assert!(seconds.abs() <= Self::MAX_SECONDS);
        UtcOffset { seconds }
    }

    pub fn seconds(self) -> i32 {
        self.seconds
    }

    pub fn is_utc(self) -> bool {
        self.seconds == 0
    }

    /// Parse the canonical textual forms: `Z`, `+HH:MM`, `-HH:MM`,
    /// `+HH:MM:SS`.
    pub fn parse(s: &str) -> Result<UtcOffset> {
        if s == "Z" || s == "z" {
            return Ok(UtcOffset::UTC);
        }
        let bad = || CivilError::InvalidOffset(format!("'{s}' is not a valid offset"));
        let (sign, rest) = match s.as_bytes().first() {
            Some(b'+') => (1, &s[1..]),
            Some(b'-') => (-1, &s[1..]),
            _ => return Err(bad()),
        };
        let mut parts = rest.split(':');
        let hours: i32 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let minutes: i32 = match parts.next() {
            Some(m) => m.parse().map_err(|_| bad())?,
            None => 0,
        };
        let seconds: i32 = match parts.next() {
            Some(sec) => sec.parse().map_err(|_| bad())?,
            None => 0,
        };
        if parts.next().is_some() || minutes > 59 || seconds > 59 {
            return Err(bad());
        }
        UtcOffset::from_seconds(sign * (hours * 3600 + minutes * 60 + seconds))
    }
}

impl fmt::Display for UtcOffset {
    /// `Z` for zero, otherwise `+HH:MM` or `+HH:MM:SS`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds == 0 {
            return f.write_str("Z");
        }
        let sign = if self.seconds < 0 { '-' } else { '+' };
        let abs = self.seconds.unsigned_abs();
        let (h, m, s) = (abs / 3600, abs % 3600 / 60, abs % 60);
        if s == 0 {
            write!(f, "{sign}{h:02}:{m:02}")
        } else {
            write!(f, "{sign}{h:02}:{m:02}:{s:02}")
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_enforced() {
        assert!(UtcOffset::from_seconds(18 * 3600).is_ok());
        assert!(UtcOffset::from_seconds(18 * 3600 + 1).is_err());
        assert!(UtcOffset::from_seconds(-18 * 3600 - 1).is_err());
    }

    #[test]
    fn test_parse_canonical_forms() {
        assert_eq!(UtcOffset::parse("Z").unwrap(), UtcOffset::UTC);
        assert_eq!(UtcOffset::parse("+05:30").unwrap().seconds(), 19800);
        assert_eq!(UtcOffset::parse("-08:00").unwrap().seconds(), -28800);
        assert_eq!(UtcOffset::parse("+00:00").unwrap(), UtcOffset::UTC);
        assert_eq!(UtcOffset::parse("+01:02:03").unwrap().seconds(), 3723);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(UtcOffset::parse("5:30").is_err());
        assert!(UtcOffset::parse("+5:61").is_err());
        assert!(UtcOffset::parse("+19:00").is_err());
        assert!(UtcOffset::parse("").is_err());
        assert!(UtcOffset::parse("+aa:00").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["Z", "+05:30", "-08:00", "+00:00:30"] {
            let parsed = UtcOffset::parse(text).unwrap();
            assert_eq!(UtcOffset::parse(&parsed.to_string()).unwrap(), parsed);
        }
        assert_eq!(UtcOffset::from_hms(5, 30, 0).unwrap().to_string(), "+05:30");
        assert_eq!(UtcOffset::UTC.to_string(), "Z");
    }
}
