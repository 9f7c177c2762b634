//! Normalization of ICS date tokens.
//!
//! ICS encodes event times in three wire shapes, each with its own timezone
//! semantics:
//! - `YYYYMMDD`: a calendar date (all-day event)
//! - `YYYYMMDDTHHMMSS`: floating wall-clock time
//! - `YYYYMMDDTHHMMSSZ`: UTC
//!
//! Anything else is handed to a generic ISO-8601 parser. Out-of-range
//! components are not rejected up front; they surface as [`EventDate::Invalid`]
//! and every consumer has to cope with that.

use std::cmp::Ordering;
use std::fmt;

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat,
    TimeZone, Utc,
};
use chrono_tz::{Europe::Warsaw, Tz};

/// Zone used for floating times whenever an instant is needed, and for all display.
pub const DISPLAY_TZ: Tz = Warsaw;

/// A normalized event date or time.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDate {
    /// All-day value, no time and no offset.
    Date(NaiveDate),
    /// Wall-clock time with no offset attached.
    Floating(NaiveDateTime),
    Utc(DateTime<Utc>),
    /// Wall-clock time anchored to an IANA zone (from a `TZID` parameter).
    Zoned(DateTime<Tz>),
    /// Time with an explicit numeric offset (from the ISO-8601 fallback).
    Offset(DateTime<FixedOffset>),
    /// Token that could not be understood, kept verbatim.
    Invalid(String),
}

/// Normalize a date token with no zone information.
pub fn normalize(token: &str) -> EventDate {
    normalize_in(token, None)
}

/// Normalize a date token, anchoring floating times to `tzid` when it names
/// a known zone.
pub fn normalize_in(token: &str, tzid: Option<&str>) -> EventDate {
    let token = token.trim();

    let parsed = match token.len() {
        8 if token.bytes().all(|b| b.is_ascii_digit()) => {
            parse_basic_date(token).map(EventDate::Date)
        }
        15 => parse_basic_datetime(token).and_then(|naive| {
            match tzid.and_then(|id| id.parse::<Tz>().ok()) {
                Some(tz) => anchor(naive, tz).map(EventDate::Zoned),
                None => Some(EventDate::Floating(naive)),
            }
        }),
        16 if token.ends_with('Z') => {
            parse_basic_datetime(&token[..15]).map(|naive| EventDate::Utc(naive.and_utc()))
        }
        _ => return parse_generic(token),
    };

    parsed.unwrap_or_else(|| EventDate::Invalid(token.to_string()))
}

impl EventDate {
    pub fn is_valid(&self) -> bool {
        !matches!(self, EventDate::Invalid(_))
    }

    /// The absolute instant of this value. Dates and floating times are read
    /// as Europe/Warsaw wall-clock time.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            EventDate::Date(d) => {
                anchor(d.and_time(NaiveTime::MIN), DISPLAY_TZ).map(|dt| dt.with_timezone(&Utc))
            }
            EventDate::Floating(naive) => {
                anchor(*naive, DISPLAY_TZ).map(|dt| dt.with_timezone(&Utc))
            }
            EventDate::Utc(dt) => Some(*dt),
            EventDate::Zoned(dt) => Some(dt.with_timezone(&Utc)),
            EventDate::Offset(dt) => Some(dt.with_timezone(&Utc)),
            EventDate::Invalid(_) => None,
        }
    }

    /// Wall-clock time of this value in Europe/Warsaw.
    pub fn local(&self) -> Option<NaiveDateTime> {
        match self {
            EventDate::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            EventDate::Floating(naive) => Some(*naive),
            EventDate::Invalid(_) => None,
            other => other
                .instant()
                .map(|dt| dt.with_timezone(&DISPLAY_TZ).naive_local()),
        }
    }

    /// Chronological order. Invalid values sort after every valid one and
    /// compare equal among themselves, so a stable sort keeps their input order.
    pub fn chronological_cmp(&self, other: &EventDate) -> Ordering {
        match (self.instant(), other.instant()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Canonical string form, which [`normalize`] reads back to the same string
/// and instant. Dates are written as local midnight without an offset.
impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%dT00:00:00")),
            EventDate::Floating(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
            EventDate::Utc(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            EventDate::Zoned(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, false))
            }
            EventDate::Offset(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, false))
            }
            EventDate::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

/// Resolve a wall-clock time in `tz`. Times skipped by a DST jump are moved
/// forward by an hour.
fn anchor(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

/// `YYYYMMDD`
fn parse_basic_date(s: &str) -> Option<NaiveDate> {
    let year = s.get(0..4)?.parse().ok()?;
    let month = s.get(4..6)?.parse().ok()?;
    let day = s.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `YYYYMMDDTHHMMSS`
fn parse_basic_datetime(s: &str) -> Option<NaiveDateTime> {
    let date = parse_basic_date(s.get(0..8)?)?;
    if s.get(8..9)? != "T" {
        return None;
    }
    let hour = s.get(9..11)?.parse().ok()?;
    let minute = s.get(11..13)?.parse().ok()?;
    let second = s.get(13..15)?.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, second).map(|time| date.and_time(time))
}

const FLOATING_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

fn parse_generic(token: &str) -> EventDate {
    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return if token.ends_with(['Z', 'z']) {
            EventDate::Utc(dt.with_timezone(&Utc))
        } else {
            EventDate::Offset(dt)
        };
    }

    for format in FLOATING_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(token, format) {
            return EventDate::Floating(naive);
        }
    }

    match NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        Ok(d) => EventDate::Date(d),
        Err(_) => EventDate::Invalid(token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_only_token_is_naive_midnight() {
        let date = normalize("20240115");
        assert_eq!(date, EventDate::Date(ymd(2024, 1, 15)));
        assert_eq!(date.local(), Some(ymd(2024, 1, 15).and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(date.to_string(), "2024-01-15T00:00:00");
    }

    #[test]
    fn test_floating_token_keeps_wall_clock() {
        let date = normalize("20240115T143000");
        let expected = ymd(2024, 1, 15).and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(date, EventDate::Floating(expected));
        assert_eq!(date.local(), Some(expected));
        assert_eq!(date.to_string(), "2024-01-15T14:30:00");
    }

    #[test]
    fn test_utc_token_displays_in_warsaw() {
        let winter = normalize("20240115T143000Z");
        assert_eq!(
            winter,
            EventDate::Utc(Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap())
        );
        assert_eq!(winter.local().unwrap().hour(), 15);

        let summer = normalize("20240715T143000Z");
        assert_eq!(summer.local().unwrap().hour(), 16);
        assert_eq!(winter.to_string(), "2024-01-15T14:30:00Z");
    }

    #[test]
    fn test_tzid_anchors_floating_time() {
        let date = normalize_in("20240115T143000", Some("America/New_York"));
        assert!(matches!(date, EventDate::Zoned(_)));
        assert_eq!(
            date.instant(),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 19, 30, 0).unwrap())
        );

        let unknown = normalize_in("20240115T143000", Some("Mars/Olympus"));
        assert!(matches!(unknown, EventDate::Floating(_)));
    }

    #[test]
    fn test_out_of_range_components_are_invalid() {
        assert_eq!(normalize("20241301"), EventDate::Invalid("20241301".into()));
        assert_eq!(
            normalize("20240115T256000Z"),
            EventDate::Invalid("20240115T256000Z".into())
        );
        assert!(normalize("20240115X143000").instant().is_none());
        assert!(!normalize("next tuesday").is_valid());
    }

    #[test]
    fn test_generic_fallback_shapes() {
        assert!(matches!(normalize("2024-03-01T10:00:00Z"), EventDate::Utc(_)));
        assert!(matches!(normalize("2024-03-01T10:00:00.000Z"), EventDate::Utc(_)));
        assert!(matches!(normalize("2024-03-01T10:00:00+01:00"), EventDate::Offset(_)));
        assert!(matches!(normalize("2024-03-01T10:00"), EventDate::Floating(_)));
        assert_eq!(normalize("2024-03-01"), EventDate::Date(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_canonical_form_normalizes_to_same_value() {
        for token in [
            "20240115",
            "20240115T143000",
            "20240115T143000Z",
            "2024-03-01T10:00:00+02:00",
        ] {
            let first = normalize(token);
            let second = normalize(&first.to_string());
            assert_eq!(first.to_string(), second.to_string(), "token {token}");
            assert_eq!(first.instant(), second.instant(), "token {token}");
        }
    }

    #[test]
    fn test_invalid_sorts_after_valid() {
        let valid = normalize("20240115");
        let invalid = normalize("garbage");
        assert_eq!(valid.chronological_cmp(&invalid), Ordering::Less);
        assert_eq!(invalid.chronological_cmp(&valid), Ordering::Greater);
        assert_eq!(invalid.chronological_cmp(&invalid), Ordering::Equal);
    }

    #[test]
    fn test_floating_time_in_dst_gap_moves_forward() {
        // 2024-03-31 02:30 does not exist in Warsaw
        let date = normalize("20240331T023000");
        assert_eq!(
            date.instant(),
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap())
        );
    }
}
