//! Time-tag parsing and interval filtering
//!
//! Every GP2 line starts with a fixed-width time tag such as
//! `29/10/2014 20:31:08.942`. The tag is read as six integers
//! (`dd/mm/yyyy hh:mm:ss`) and converted to an instant in the local time zone
//! with one second resolution; the milliseconds are ignored.

use crate::types::{DecoderError, Rejection, Result, Timestamp};
use chrono::{Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone};

/// Width of the time tag at the start of every GP2 line
pub const TIME_TAG_LEN: usize = 23;

/// Default start date of the extraction window
pub const DEFAULT_FROM_DATE: &str = "01/01/2014";
/// Default start time of the extraction window
pub const DEFAULT_FROM_TIME: &str = "00:00:00";
/// Default end date of the extraction window
pub const DEFAULT_TO_DATE: &str = "31/12/2020";
/// Default end time of the extraction window
pub const DEFAULT_TO_TIME: &str = "23:59:59";

/// Return the time tag of a line (its first [`TIME_TAG_LEN`] characters,
/// or the whole line when it is shorter)
pub fn time_tag(line: &str) -> &str {
    match line.char_indices().nth(TIME_TAG_LEN) {
        Some((idx, _)) => &line[..idx],
        None => line.trim_end_matches(&['\r', '\n'][..]),
    }
}

/// Parse `dd/mm/yyyy hh:mm:ss` at the start of `text` into a local instant
///
/// Anything after the seconds field (milliseconds, the rest of a GP2 line)
/// is ignored. Fields outside their calendar range carry into the next unit
/// the way `mktime` does: `31/04/2015` is 1 May and `24:00:00` is midnight of
/// the following day. Returns `None` when any of the six fields is missing
/// or the result does not fit a calendar date. A local time inside a DST gap
/// is moved forward by one hour; ambiguous local times resolve to the
/// earlier instant.
pub fn parse_date_time(text: &str) -> Option<Timestamp> {
    let mut scan = Scanner::new(text);
    let day = scan.int()?;
    scan.literal('/')?;
    let month = scan.int()?;
    scan.literal('/')?;
    let year = scan.int()?;
    scan.whitespace();
    let hour = scan.int()?;
    scan.literal(':')?;
    let minute = scan.int()?;
    scan.literal(':')?;
    let second = scan.int()?;

    let months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let first_of_month = NaiveDate::from_ymd_opt(
        i32::try_from(months.div_euclid(12)).ok()?,
        u32::try_from(months.rem_euclid(12) + 1).ok()?,
        1,
    )?;
    let offset = day
        .checked_sub(1)?
        .checked_mul(86_400)?
        .checked_add(hour.checked_mul(3_600)?)?
        .checked_add(minute.checked_mul(60)?)?
        .checked_add(second)?;
    let naive = first_of_month
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::try_seconds(offset)?)?;
    to_local(naive)
}

fn to_local(naive: NaiveDateTime) -> Option<Timestamp> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => Local
            .from_local_datetime(&naive.checked_add_signed(Duration::hours(1))?)
            .earliest(),
    }
}

/// Parse a boundary given as separate date and time strings
pub fn parse_boundary(date: &str, time: &str) -> Result<Timestamp> {
    let text = format!("{} {}", date.trim(), time.trim());
    parse_date_time(&text).ok_or(DecoderError::InvalidBoundary(text))
}

/// Closed time interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    start: Timestamp,
    end: Timestamp,
}

impl TimeInterval {
    /// Create an interval, failing if `start > end`
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(DecoderError::ReversedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build an interval from the four configuration strings
    ///
    /// # Example
    /// ```
    /// use gp2_decoder::TimeInterval;
    ///
    /// let interval = TimeInterval::from_date_time(
    ///     "01/01/2014", "00:00:00", "31/12/2020", "23:59:59",
    /// ).unwrap();
    /// assert!(interval.check("29/10/2014 20:31:08.942").is_ok());
    /// ```
    pub fn from_date_time(
        from_date: &str,
        from_time: &str,
        to_date: &str,
        to_time: &str,
    ) -> Result<Self> {
        let start = parse_boundary(from_date, from_time)?;
        let end = parse_boundary(to_date, to_time)?;
        Self::new(start, end)
    }

    /// The default window `[01/01/2014 00:00:00, 31/12/2020 23:59:59]`
    pub fn default_window() -> Result<Self> {
        Self::from_date_time(
            DEFAULT_FROM_DATE,
            DEFAULT_FROM_TIME,
            DEFAULT_TO_DATE,
            DEFAULT_TO_TIME,
        )
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Inclusive on both ends
    pub fn contains(&self, instant: &Timestamp) -> bool {
        self.start <= *instant && *instant <= self.end
    }

    /// Parse the time tag of a line and accept it if it lies in the interval
    pub fn check(&self, line: &str) -> std::result::Result<Timestamp, Rejection> {
        let instant = parse_date_time(line).ok_or(Rejection::InvalidTimeTag)?;
        if self.contains(&instant) {
            Ok(instant)
        } else {
            Err(Rejection::OutsideInterval)
        }
    }
}

/// Minimal cursor over `%d` fields and literal separators
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn literal(&mut self, expected: char) -> Option<()> {
        self.rest = self.rest.strip_prefix(expected)?;
        Some(())
    }

    /// Optional leading whitespace, optional sign, one or more digits
    fn int(&mut self) -> Option<i64> {
        self.whitespace();
        let bytes = self.rest.as_bytes();
        let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
        let digits = bytes[sign_len..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }
        let (number, rest) = self.rest.split_at(sign_len + digits);
        self.rest = rest;
        number.parse().ok()
    }
}
