//! Time utilities: calendar-day keys and local wall-clock parsing.
//!
//! Everything inside the core works on local wall-clock time
//! (`NaiveDateTime`). Conversion from a real instant happens once, at the
//! edge, through [`local_now`].

use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Calendar-day identity. Two timestamps share a key iff they fall on the
/// same local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn day_of_month(self) -> u32 {
        self.0.day()
    }

    /// Shift by a signed number of days. `None` only at the edge of chrono's range.
    pub fn offset(self, days: i64) -> Option<Self> {
        self.0.checked_add_signed(Duration::days(days)).map(Self)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Anything that sits on a calendar day.
pub trait AsDayKey {
    fn day_key(&self) -> DayKey;
}

impl AsDayKey for DayKey {
    fn day_key(&self) -> DayKey {
        *self
    }
}

impl AsDayKey for NaiveDate {
    fn day_key(&self) -> DayKey {
        DayKey(*self)
    }
}

impl AsDayKey for NaiveDateTime {
    fn day_key(&self) -> DayKey {
        DayKey(self.date())
    }
}

/// Zoned timestamps are keyed by the calendar day in their own zone.
impl<Z: TimeZone> AsDayKey for DateTime<Z> {
    fn day_key(&self) -> DayKey {
        DayKey(self.date_naive())
    }
}

pub fn day_key<T: AsDayKey + ?Sized>(ts: &T) -> DayKey {
    ts.day_key()
}

/// Signed number of calendar days from `from` to `to`. Time of day is ignored.
pub fn whole_days_between<A: AsDayKey + ?Sized, B: AsDayKey + ?Sized>(from: &A, to: &B) -> i64 {
    (to.day_key().0 - from.day_key().0).num_days()
}

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Current wall-clock time in `tz`.
pub fn local_now(tz: Tz, now_utc: DateTime<Utc>) -> NaiveDateTime {
    now_utc.with_timezone(&tz).naive_local()
}

/// Parse "2024-05-03 14:30" as local wall-clock time.
pub fn parse_local_datetime(local: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))
}

/// Parse "2024-05-03".
pub fn parse_day(day: &str) -> Result<DayKey> {
    NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
        .map(DayKey)
        .map_err(|e| anyhow::anyhow!("invalid date '{day}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn day_key_ignores_time_of_day() {
        assert_eq!(day_key(&at(2024, 5, 3, 0, 0)), day_key(&at(2024, 5, 3, 23, 59)));
        assert_ne!(day_key(&at(2024, 5, 3, 23, 59)), day_key(&at(2024, 5, 4, 0, 0)));
    }

    #[test]
    fn zoned_timestamps_use_their_own_calendar() {
        // 2024-05-03 22:30 UTC is already 05-04 in Moscow (UTC+3).
        let utc = Utc.with_ymd_and_hms(2024, 5, 3, 22, 30, 0).unwrap();
        let msk = utc.with_timezone(&chrono_tz::Europe::Moscow);
        assert_eq!(day_key(&utc), DayKey::from_ymd(2024, 5, 3).unwrap());
        assert_eq!(day_key(&msk), DayKey::from_ymd(2024, 5, 4).unwrap());
    }

    #[test]
    fn whole_days_floor_by_calendar_day() {
        let a = at(2024, 1, 31, 23, 0);
        let b = at(2024, 2, 1, 1, 0);
        assert_eq!(whole_days_between(&a, &b), 1);
        assert_eq!(whole_days_between(&b, &a), -1);
        assert_eq!(whole_days_between(&a, &at(2024, 1, 31, 8, 0)), 0);
    }

    #[test]
    fn local_now_converts_into_zone() {
        let utc = Utc.with_ymd_and_hms(2024, 2, 20, 21, 0, 0).unwrap();
        let tz = parse_timezone("Europe/Moscow").unwrap();
        assert_eq!(local_now(tz, utc), at(2024, 2, 21, 0, 0));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_timezone("Mars/Olympus").is_err());
        assert!(parse_local_datetime("2024-02-30 10:00").is_err());
        assert!(parse_day("03.05.2024").is_err());
        assert_eq!(parse_day("2024-05-03").unwrap().to_string(), "2024-05-03");
    }
}
