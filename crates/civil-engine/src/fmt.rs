//! Pattern-based formatting and parsing, plus the canonical ISO profiles.
//!
//! A pattern string compiles once into a [`Pattern`] (a token sequence) and
//! is then reused for both directions. Every field token is fixed-width, so
//! parsing is a single deterministic left-to-right walk with no
//! backtracking; errors report the byte position and what was expected
//! there.
//!
//! Token reference (letter runs; any other letter is rejected at compile):
//!
//! | token   | meaning                                      |
//! |---------|----------------------------------------------|
//! | `y`     | year, minimal digits                         |
//! | `yyyy`  | year, zero-padded to 4, `-` sign if negative |
//! | `YYYY`  | ISO week-based year, padded like `yyyy`      |
//! | `MM`    | month 01-12                                  |
//! | `MMM`   | month abbreviation `Jan`..`Dec`              |
//! | `dd`    | day of month 01-31                           |
//! | `DDD`   | day of year 001-366                          |
//! | `EEE`   | weekday abbreviation `Mon`..`Sun`            |
//! | `e`     | ISO weekday number 1-7                       |
//! | `ww`    | ISO week of week-based year 01-53            |
//! | `HH`    | hour of day 00-23                            |
//! | `hh`    | clock hour 01-12, requires `a`               |
//! | `mm`    | minute 00-59                                 |
//! | `ss`    | second 00-59                                 |
//! | `S`..`SSSSSSSSS` | fraction of second, 1-9 digits      |
//! | `a`     | `AM`/`PM`                                    |
//! | `XX`    | offset `+HHMM` (`+0000` for UTC)             |
//! | `XXX`   | offset `+HH:MM`, `Z` for UTC                 |
//! | `VV`    | zone identifier                              |
//!
//! Text between single quotes is literal; `''` is a literal quote.
//! Non-letter characters outside quotes are literals.

use std::fmt::Write as _;

use crate::date::{CivilDate, Weekday};
use crate::datetime::LocalDateTime;
use crate::error::{CivilError, Result};
use crate::offset::UtcOffset;
use crate::time::ClockTime;
use crate::tzdb::{TzDatabase, ZoneId};
use crate::zoned::{OffsetDateTime, ZonedDateTime};

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ── ISO week numbering ──────────────────────────────────────────────────────

/// The ISO 8601 week-based year and week number of a date.
///
/// The week-based year can differ from the calendar year near January 1:
/// a week belongs to the year that contains its Thursday.
pub fn iso_week_of_year(date: CivilDate) -> (i32, u8) {
    let thursday =
        date.plus_days(3 - i64::from(date.day_of_week().days_from_monday()));
    let week = (thursday.day_of_year() - 1) / 7 + 1;
    (thursday.year(), week as u8)
}

/// Number of ISO weeks in a week-based year: 53 when January 1 falls on a
/// Thursday, or on a Wednesday of a leap year; 52 otherwise.
pub fn iso_weeks_in_year(week_year: i32) -> u8 {
    // January 1 of any year, reached infallibly from the epoch.
    let jan1 = CivilDate::from_epoch_day(0).plus_years(i64::from(week_year) - 1970);
    match jan1.day_of_week() {
        Weekday::Thursday => 53,
        Weekday::Wednesday if CivilDate::is_leap_year(week_year) => 53,
        _ => 52,
    }
}

/// The date of a given ISO week-date triple.
///
/// # Errors
///
/// Returns [`CivilError::InvalidDate`] when `week` exceeds the week-based
/// year's week count.
pub fn date_from_iso_week(week_year: i32, week: u8, weekday: Weekday) -> Result<CivilDate> {
    let max = iso_weeks_in_year(week_year);
    if week == 0 || week > max {
        return Err(CivilError::InvalidDate(format!(
            "week must be 1-{max} for week-year {week_year}, got {week}"
        )));
    }
    // Week 1 is the week containing January 4.
    let jan4 = CivilDate::new(week_year, 1, 4)?;
    let week1_monday = jan4.minus_days(i64::from(jan4.day_of_week().days_from_monday()));
    Ok(week1_monday
        .plus_days(i64::from(week - 1) * 7 + i64::from(weekday.days_from_monday())))
}

// ── Pattern ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year { padded: bool },
    WeekYear,
    Month2,
    MonthAbbrev,
    Day2,
    DayOfYear3,
    WeekdayAbbrev,
    WeekdayNumber,
    IsoWeek2,
    Hour2,
    ClockHour2,
    Minute2,
    Second2,
    Fraction(usize),
    AmPm,
    OffsetBasic,
    OffsetExtended,
    ZoneName,
}

/// A compiled pattern, usable for both formatting and parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compile a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`CivilError::InvalidPattern`] for unknown letters, letter
    /// runs of unsupported length, an unterminated quote, or `hh` without
    /// a matching `a`.
    pub fn compile(pattern: &str) -> Result<Pattern> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;

        let flush = |literal: &mut String, tokens: &mut Vec<Token>| {
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(literal)));
            }
        };

        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    literal.push('\'');
                    i += 2;
                    continue;
                }
                // Quoted section; a doubled quote inside it is an escaped
                // quote, not a terminator.
                i += 1;
                loop {
                    match chars.get(i) {
                        Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                            literal.push('\'');
                            i += 2;
                        }
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(&inner) => {
                            literal.push(inner);
                            i += 1;
                        }
                        None => {
                            return Err(CivilError::InvalidPattern(format!(
                                "unterminated quote in '{pattern}'"
                            )));
                        }
                    }
                }
                continue;
            }
            if !c.is_ascii_alphabetic() {
                literal.push(c);
                i += 1;
                continue;
            }
            let mut run = 1;
            while chars.get(i + run) == Some(&c) {
                run += 1;
            }
            flush(&mut literal, &mut tokens);
            let token = match (c, run) {
                ('y', 1) => Token::Year { padded: false },
                ('y', 4) => Token::Year { padded: true },
                ('Y', 4) => Token::WeekYear,
                ('M', 2) => Token::Month2,
                ('M', 3) => Token::MonthAbbrev,
                ('d', 2) => Token::Day2,
                ('D', 3) => Token::DayOfYear3,
                ('E', 3) => Token::WeekdayAbbrev,
                ('e', 1) => Token::WeekdayNumber,
                ('w', 2) => Token::IsoWeek2,
                ('H', 2) => Token::Hour2,
                ('h', 2) => Token::ClockHour2,
                ('m', 2) => Token::Minute2,
                ('s', 2) => Token::Second2,
                ('S', n @ 1..=9) => Token::Fraction(n),
                ('a', 1) => Token::AmPm,
                ('X', 2) => Token::OffsetBasic,
                ('X', 3) => Token::OffsetExtended,
                ('V', 2) => Token::ZoneName,
                _ => {
                    return Err(CivilError::InvalidPattern(format!(
                        "unsupported field '{}' in '{pattern}'",
                        c.to_string().repeat(run)
                    )));
                }
            };
            tokens.push(token);
            i += run;
        }
        flush(&mut literal, &mut tokens);

        let has_clock_hour = tokens.iter().any(|t| *t == Token::ClockHour2);
        let has_am_pm = tokens.iter().any(|t| *t == Token::AmPm);
        if has_clock_hour && !has_am_pm {
            return Err(CivilError::InvalidPattern(format!(
                "'hh' requires 'a' in the same pattern: '{pattern}'"
            )));
        }
        Ok(Pattern { tokens })
    }

    // ── formatting ──────────────────────────────────────────────────────

    pub fn format_date(&self, date: CivilDate) -> Result<String> {
        self.render(Some(date), None, None, None)
    }

    pub fn format_time(&self, time: ClockTime) -> Result<String> {
        self.render(None, Some(time), None, None)
    }

    pub fn format_local(&self, local: LocalDateTime) -> Result<String> {
        self.render(Some(local.date()), Some(local.time()), None, None)
    }

    pub fn format_offset(&self, value: OffsetDateTime) -> Result<String> {
        self.render(
            Some(value.local().date()),
            Some(value.local().time()),
            Some(value.offset()),
            None,
        )
    }

    pub fn format_zoned(&self, value: &ZonedDateTime) -> Result<String> {
        self.render(
            Some(value.local().date()),
            Some(value.local().time()),
            Some(value.offset()),
            Some(value.zone()),
        )
    }

    fn render(
        &self,
        date: Option<CivilDate>,
        time: Option<ClockTime>,
        offset: Option<UtcOffset>,
        zone: Option<&ZoneId>,
    ) -> Result<String> {
        let date_of = |field: &str| {
            date.ok_or_else(|| {
                CivilError::InvalidPattern(format!("'{field}' needs a date component"))
            })
        };
        let time_of = |field: &str| {
            time.ok_or_else(|| {
                CivilError::InvalidPattern(format!("'{field}' needs a time component"))
            })
        };
        let offset_of = |field: &str| {
            offset.ok_or_else(|| {
                CivilError::InvalidPattern(format!("'{field}' needs an offset component"))
            })
        };

        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Year { padded } => {
                    write_year(&mut out, date_of("y")?.year(), *padded);
                }
                Token::WeekYear => {
                    let (week_year, _) = iso_week_of_year(date_of("YYYY")?);
                    write_year(&mut out, week_year, true);
                }
                Token::Month2 => {
                    let _ = write!(out, "{:02}", date_of("MM")?.month());
                }
                Token::MonthAbbrev => {
                    out.push_str(MONTH_ABBREV[(date_of("MMM")?.month() - 1) as usize]);
                }
                Token::Day2 => {
                    let _ = write!(out, "{:02}", date_of("dd")?.day());
                }
                Token::DayOfYear3 => {
                    let _ = write!(out, "{:03}", date_of("DDD")?.day_of_year());
                }
                Token::WeekdayAbbrev => {
                    out.push_str(date_of("EEE")?.day_of_week().abbreviation());
                }
                Token::WeekdayNumber => {
                    let _ = write!(out, "{}", date_of("e")?.day_of_week().iso_number());
                }
                Token::IsoWeek2 => {
                    let (_, week) = iso_week_of_year(date_of("ww")?);
                    let _ = write!(out, "{week:02}");
                }
                Token::Hour2 => {
                    let _ = write!(out, "{:02}", time_of("HH")?.hour());
                }
                Token::ClockHour2 => {
                    let clock = (time_of("hh")?.hour() + 11) % 12 + 1;
                    let _ = write!(out, "{clock:02}");
                }
                Token::Minute2 => {
                    let _ = write!(out, "{:02}", time_of("mm")?.minute());
                }
                Token::Second2 => {
                    let _ = write!(out, "{:02}", time_of("ss")?.second());
                }
                Token::Fraction(digits) => {
                    let nanos = format!("{:09}", time_of("S")?.nanosecond());
                    out.push_str(&nanos[..*digits]);
                }
                Token::AmPm => {
                    out.push_str(if time_of("a")?.hour() < 12 { "AM" } else { "PM" });
                }
                Token::OffsetBasic => {
                    let seconds = offset_of("XX")?.seconds();
                    let sign = if seconds < 0 { '-' } else { '+' };
                    let abs = seconds.unsigned_abs();
                    let _ = write!(out, "{sign}{:02}{:02}", abs / 3600, abs % 3600 / 60);
                }
                Token::OffsetExtended => {
                    let seconds = offset_of("XXX")?.seconds();
                    if seconds == 0 {
                        out.push('Z');
                    } else {
                        let sign = if seconds < 0 { '-' } else { '+' };
                        let abs = seconds.unsigned_abs();
                        let _ = write!(out, "{sign}{:02}:{:02}", abs / 3600, abs % 3600 / 60);
                    }
                }
                Token::ZoneName => {
                    let id = zone.ok_or_else(|| {
                        CivilError::InvalidPattern("'VV' needs a zone component".to_string())
                    })?;
                    out.push_str(id.name());
                }
            }
        }
        Ok(out)
    }

    // ── parsing ─────────────────────────────────────────────────────────

    /// Parse a calendar date; the pattern must carry a complete date
    /// (year/month/day, year/day-of-year, or an ISO week-date triple).
    pub fn parse_date(&self, text: &str) -> Result<CivilDate> {
        self.extract(text)?.to_date()
    }

    pub fn parse_time(&self, text: &str) -> Result<ClockTime> {
        self.extract(text)?.to_time()
    }

    pub fn parse_local(&self, text: &str) -> Result<LocalDateTime> {
        let fields = self.extract(text)?;
        Ok(LocalDateTime::new(fields.to_date()?, fields.to_time()?))
    }

    /// Parse local fields plus a literal offset; the pattern must carry an
    /// offset token.
    pub fn parse_offset(&self, text: &str) -> Result<OffsetDateTime> {
        let fields = self.extract(text)?;
        let offset = fields.offset.ok_or_else(|| {
            CivilError::InvalidPattern("pattern has no offset field".to_string())
        })?;
        Ok(OffsetDateTime::new(
            LocalDateTime::new(fields.to_date()?, fields.to_time()?),
            offset,
        ))
    }

    /// Parse a zoned value from a pattern carrying a `VV` zone field, or an
    /// offset field interpreted as a fixed-offset zone.
    pub fn parse_zoned(&self, text: &str, db: &TzDatabase) -> Result<ZonedDateTime> {
        let fields = self.extract(text)?;
        let local = LocalDateTime::new(fields.to_date()?, fields.to_time()?);
        match (&fields.zone, fields.offset) {
            (Some(name), Some(offset)) => {
                // Offset and zone both present: the offset pins the instant,
                // the zone's table decides the resulting fields.
                let odt = OffsetDateTime::new(local, offset);
                ZonedDateTime::from_instant(odt.to_instant(), ZoneId::new(name)?, db)
            }
            (Some(name), None) => ZonedDateTime::from_local(local, ZoneId::new(name)?, db),
            (None, Some(offset)) => {
                ZonedDateTime::from_local(local, ZoneId::fixed(offset), db)
            }
            (None, None) => Err(CivilError::InvalidPattern(
                "pattern has no zone or offset field".to_string(),
            )),
        }
    }

    fn extract(&self, text: &str) -> Result<ParsedFields> {
        let mut cursor = Cursor { text, pos: 0 };
        let mut fields = ParsedFields::default();
        for token in &self.tokens {
            match token {
                Token::Literal(expected) => cursor.expect_literal(expected)?,
                Token::Year { padded } => {
                    fields.year = Some(cursor.signed_year(*padded)?);
                }
                Token::WeekYear => {
                    fields.week_year = Some(cursor.signed_year(true)?);
                }
                Token::Month2 => {
                    fields.month = Some(cursor.ranged(2, 1, 12, "month 01-12")? as u8);
                }
                Token::MonthAbbrev => {
                    let idx = cursor.one_of(&MONTH_ABBREV, "a month abbreviation")?;
                    fields.month = Some(idx as u8 + 1);
                }
                Token::Day2 => {
                    fields.day = Some(cursor.ranged(2, 1, 31, "day 01-31")? as u8);
                }
                Token::DayOfYear3 => {
                    fields.day_of_year =
                        Some(cursor.ranged(3, 1, 366, "day of year 001-366")? as u16);
                }
                Token::WeekdayAbbrev => {
                    let names: Vec<&str> =
                        Weekday::ALL.iter().map(|w| w.abbreviation()).collect();
                    let idx = cursor.one_of(&names, "a weekday abbreviation")?;
                    fields.weekday = Some(Weekday::ALL[idx]);
                }
                Token::WeekdayNumber => {
                    let n = cursor.ranged(1, 1, 7, "weekday 1-7")? as u8;
                    fields.weekday = Weekday::from_iso_number(n).ok();
                }
                Token::IsoWeek2 => {
                    fields.iso_week = Some(cursor.ranged(2, 1, 53, "week 01-53")? as u8);
                }
                Token::Hour2 => {
                    fields.hour = Some(cursor.ranged(2, 0, 23, "hour 00-23")? as u8);
                }
                Token::ClockHour2 => {
                    fields.clock_hour =
                        Some(cursor.ranged(2, 1, 12, "clock hour 01-12")? as u8);
                }
                Token::Minute2 => {
                    fields.minute = Some(cursor.ranged(2, 0, 59, "minute 00-59")? as u8);
                }
                Token::Second2 => {
                    fields.second = Some(cursor.ranged(2, 0, 59, "second 00-59")? as u8);
                }
                Token::Fraction(digits) => {
                    let raw = cursor.digits_exact(*digits, "a fraction of second")?;
                    fields.nanosecond =
                        Some((raw * 10i64.pow(9 - *digits as u32)) as u32);
                }
                Token::AmPm => {
                    let idx = cursor.one_of(&["AM", "PM", "am", "pm"], "AM or PM")?;
                    fields.pm = Some(idx % 2 == 1);
                }
                Token::OffsetBasic => {
                    fields.offset = Some(cursor.offset_basic()?);
                }
                Token::OffsetExtended => {
                    fields.offset = Some(cursor.offset_extended()?);
                }
                Token::ZoneName => {
                    fields.zone = Some(cursor.zone_name()?);
                }
            }
        }
        if cursor.pos != text.len() {
            return Err(cursor.fail("end of input"));
        }
        Ok(fields)
    }
}

fn write_year(out: &mut String, year: i32, padded: bool) {
    if padded {
        if year < 0 {
            let _ = write!(out, "-{:04}", -i64::from(year));
        } else {
            let _ = write!(out, "{year:04}");
        }
    } else {
        let _ = write!(out, "{year}");
    }
}

// ── Parsed field assembly ───────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ParsedFields {
    year: Option<i32>,
    week_year: Option<i32>,
    month: Option<u8>,
    day: Option<u8>,
    day_of_year: Option<u16>,
    weekday: Option<Weekday>,
    iso_week: Option<u8>,
    hour: Option<u8>,
    clock_hour: Option<u8>,
    minute: Option<u8>,
    second: Option<u8>,
    nanosecond: Option<u32>,
    pm: Option<bool>,
    offset: Option<UtcOffset>,
    zone: Option<String>,
}

impl ParsedFields {
    fn to_date(&self) -> Result<CivilDate> {
        let date = if let (Some(year), Some(month), Some(day)) = (self.year, self.month, self.day)
        {
            CivilDate::new(year, month, day)?
        } else if let (Some(year), Some(doy)) = (self.year, self.day_of_year) {
            CivilDate::from_year_day(year, doy)?
        } else if let (Some(wy), Some(week), Some(weekday)) =
            (self.week_year, self.iso_week, self.weekday)
        {
            date_from_iso_week(wy, week, weekday)?
        } else {
            return Err(CivilError::InvalidPattern(
                "pattern does not assemble a complete date".to_string(),
            ));
        };
        // A redundantly parsed weekday must agree with the date it rides on.
        if let Some(weekday) = self.weekday {
            if weekday != date.day_of_week() {
                return Err(CivilError::ParseFailure {
                    position: 0,
                    expected: format!("a weekday matching {date} ({})", date.day_of_week().abbreviation()),
                });
            }
        }
        Ok(date)
    }

    fn to_time(&self) -> Result<ClockTime> {
        let hour = match (self.hour, self.clock_hour, self.pm) {
            (Some(h), _, _) => h,
            (None, Some(clock), Some(pm)) => clock % 12 + if pm { 12 } else { 0 },
            _ => {
                return Err(CivilError::InvalidPattern(
                    "pattern does not assemble a complete time".to_string(),
                ));
            }
        };
        ClockTime::new(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanosecond.unwrap_or(0),
        )
    }
}

// ── Input cursor ────────────────────────────────────────────────────────────

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl Cursor<'_> {
    fn fail(&self, expected: impl Into<String>) -> CivilError {
        CivilError::ParseFailure { position: self.pos, expected: expected.into() }
    }

    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn expect_literal(&mut self, expected: &str) -> Result<()> {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            Ok(())
        } else {
            Err(self.fail(format!("'{expected}'")))
        }
    }

    fn digits_exact(&mut self, count: usize, what: &str) -> Result<i64> {
        let rest = self.rest();
        let run = rest.bytes().take(count).take_while(u8::is_ascii_digit).count();
        if run < count {
            return Err(self.fail(what.to_string()));
        }
        let value = rest[..count].parse::<i64>().map_err(|_| self.fail(what.to_string()))?;
        self.pos += count;
        Ok(value)
    }

    fn ranged(&mut self, width: usize, min: i64, max: i64, what: &str) -> Result<i64> {
        let start = self.pos;
        let value = self.digits_exact(width, what)?;
        if value < min || value > max {
            self.pos = start;
            return Err(self.fail(what.to_string()));
        }
        Ok(value)
    }

    /// A year: optional `-` sign, then exactly 4 digits when padded, or a
    /// greedy 1-9 digit run otherwise.
    fn signed_year(&mut self, padded: bool) -> Result<i32> {
        let negative = self.rest().starts_with('-');
        if negative {
            self.pos += 1;
        }
        let value = if padded {
            self.digits_exact(4, "a 4-digit year")?
        } else {
            let run = self.rest().bytes().take(9).take_while(u8::is_ascii_digit).count();
            if run == 0 {
                return Err(self.fail("a year"));
            }
            self.digits_exact(run, "a year")?
        };
        Ok(if negative { -value as i32 } else { value as i32 })
    }

    fn one_of(&mut self, candidates: &[&str], what: &str) -> Result<usize> {
        for (idx, candidate) in candidates.iter().enumerate() {
            if self.rest().starts_with(candidate) {
                self.pos += candidate.len();
                return Ok(idx);
            }
        }
        Err(self.fail(what.to_string()))
    }

    fn sign(&mut self) -> Result<i32> {
        let sign = match self.rest().bytes().next() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Err(self.fail("'+' or '-'")),
        };
        self.pos += 1;
        Ok(sign)
    }

    /// `+HHMM`.
    fn offset_basic(&mut self) -> Result<UtcOffset> {
        let start = self.pos;
        let sign = self.sign()?;
        let hours = self.ranged(2, 0, 18, "offset hours 00-18")?;
        let minutes = self.ranged(2, 0, 59, "offset minutes 00-59")?;
        UtcOffset::from_seconds(sign * (hours * 3600 + minutes * 60) as i32).map_err(|_| {
            self.pos = start;
            self.fail("an offset within +/-18:00")
        })
    }

    /// `Z` or `+HH:MM`.
    fn offset_extended(&mut self) -> Result<UtcOffset> {
        if self.rest().starts_with('Z') {
            self.pos += 1;
            return Ok(UtcOffset::UTC);
        }
        let start = self.pos;
        let sign = self.sign()?;
        let hours = self.ranged(2, 0, 18, "offset hours 00-18")?;
        self.expect_literal(":")?;
        let minutes = self.ranged(2, 0, 59, "offset minutes 00-59")?;
        UtcOffset::from_seconds(sign * (hours * 3600 + minutes * 60) as i32).map_err(|_| {
            self.pos = start;
            self.fail("an offset within +/-18:00")
        })
    }

    /// A zone identifier: the longest run of id characters.
    fn zone_name(&mut self) -> Result<String> {
        let run = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'-' | b'+' | b':'))
            .count();
        if run == 0 {
            return Err(self.fail("a zone identifier"));
        }
        let name = self.rest()[..run].to_string();
        self.pos += run;
        Ok(name)
    }
}

// ── ISO profiles ────────────────────────────────────────────────────────────

/// The canonical ISO 8601 (and RFC 1123) textual profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoProfile {
    /// `yyyyMMdd`, e.g. `20140116`.
    BasicDate,
    /// `yyyy-MM-dd`, e.g. `2014-01-16`.
    ExtendedDate,
    /// `yyyy-DDD`, e.g. `2020-061`.
    OrdinalDate,
    /// `YYYY-'W'ww-e`, e.g. `2014-W03-4`.
    WeekDate,
    /// `yyyy-MM-dd'T'HH:mm:ssXXX`, e.g. `2014-01-14T19:30:00+05:30`.
    OffsetDateTime,
    /// The offset profile with a bracketed zone suffix, e.g.
    /// `2026-01-15T09:00:00-05:00[America/New_York]`.
    ZonedDateTime,
    /// `EEE, dd MMM yyyy HH:mm:ss XX`, e.g. `Thu, 15 Jan 2026 12:00:00 +0000`.
    Rfc1123,
}

impl IsoProfile {
    pub fn pattern(self) -> &'static str {
        match self {
            IsoProfile::BasicDate => "yyyyMMdd",
            IsoProfile::ExtendedDate => "yyyy-MM-dd",
            IsoProfile::OrdinalDate => "yyyy-DDD",
            IsoProfile::WeekDate => "YYYY-'W'ww-e",
            // The bracketed zone suffix of the zoned profile sits outside
            // the token grammar; see format_iso_zoned / parse_iso_zoned.
            IsoProfile::OffsetDateTime | IsoProfile::ZonedDateTime => "yyyy-MM-dd'T'HH:mm:ssXXX",
            IsoProfile::Rfc1123 => "EEE, dd MMM yyyy HH:mm:ss XX",
        }
    }

    /// The compiled form of [`IsoProfile::pattern`].
    pub fn compile(self) -> Pattern {
        Pattern::compile(self.pattern()).expect("profile patterns compile")
    }
}

/// A zoned value in the full ISO zoned profile, bracketed zone included.
pub fn format_iso_zoned(value: &ZonedDateTime) -> String {
    // Profile tokens cover every component a zoned value carries, so
    // rendering cannot fail.
    let prefix = IsoProfile::ZonedDateTime
        .compile()
        .format_offset(value.to_offset_date_time())
        .expect("offset profile renders any offset value");
    format!("{prefix}[{}]", value.zone())
}

/// Parse the full ISO zoned profile: the offset profile followed by a
/// bracketed zone identifier. The offset pins the instant; the zone's own
/// table decides the stored fields.
pub fn parse_iso_zoned(text: &str, db: &TzDatabase) -> Result<ZonedDateTime> {
    let open = text.find('[').ok_or(CivilError::ParseFailure {
        position: text.len(),
        expected: "'['".to_string(),
    })?;
    let close = text.len() - 1;
    if !text.ends_with(']') || close <= open + 1 {
        return Err(CivilError::ParseFailure {
            position: close,
            expected: "a bracketed zone identifier".to_string(),
        });
    }
    let odt = IsoProfile::ZonedDateTime.compile().parse_offset(&text[..open])?;
    let zone = ZoneId::new(&text[open + 1..close])?;
    ZonedDateTime::from_instant(odt.to_instant(), zone, db)
}

// ── Tests ───────────────────────────────────────────────────────────────────
