// src/dates.rs
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config::consts::DEFAULT_KICKOFF_HOUR;

fn day_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})(?:[ T](\d{1,2}):(\d{2}))?$").expect("static regex")
    })
}

fn year_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})(?:[ T](\d{1,2}):(\d{2}))?$").expect("static regex")
    })
}

fn num(caps: &regex::Captures<'_>, i: usize) -> Option<u32> {
    caps.get(i)?.as_str().parse().ok()
}

fn build(y: u32, m: u32, d: u32, hm: Option<(u32, u32)>) -> Option<NaiveDateTime> {
    let (h, min) = hm.unwrap_or((DEFAULT_KICKOFF_HOUR, 0));
    let date = NaiveDate::from_ymd_opt(y as i32, m, d)?;
    let time = NaiveTime::from_hms_opt(h, min, 0)?;
    Some(NaiveDateTime::new(date, time))
}

fn hour_minute(caps: &regex::Captures<'_>) -> Option<(u32, u32)> {
    Some((num(caps, 4)?, num(caps, 5)?))
}

/// Kick-off from the sheet's date and time cells, as local wall-clock time.
///
/// Accepts `dd/mm/yyyy` and `yyyy-mm-dd` (either separator), optionally with
/// ` HH:MM`. When the date cell has no `:` the time cell is appended; with no
/// time at all the kick-off defaults to 15:00. Anything else goes through
/// RFC 3339 / ISO parsing. Impossible dates give `None`.
pub fn parse_date_time_it(date: &str, time: &str) -> Option<NaiveDateTime> {
    let s = date.trim();
    let t = time.trim();
    if s.is_empty() {
        return None;
    }

    let combined = if s.contains(':') || t.is_empty() { s!(s) } else { join!(s, " ", t) };

    if let Some(c) = day_first().captures(&combined) {
        return build(num(&c, 3)?, num(&c, 2)?, num(&c, 1)?, hour_minute(&c));
    }
    if let Some(c) = year_first().captures(&combined) {
        return build(num(&c, 1)?, num(&c, 2)?, num(&c, 3)?, hour_minute(&c));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// `2025-03-09T15:00`
pub fn to_iso_minutes(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(d: &str, t: &str) -> Option<String> {
        parse_date_time_it(d, t).map(|dt| to_iso_minutes(&dt))
    }

    #[test]
    fn italian_day_first_with_separate_time() {
        assert_eq!(iso("9/3/2025", "18:30").as_deref(), Some("2025-03-09T18:30"));
        assert_eq!(iso("09-03-2025", "").as_deref(), Some("2025-03-09T15:00"));
    }

    #[test]
    fn year_first_and_inline_time_wins() {
        assert_eq!(iso("2025/03/09 20:45", "10:00").as_deref(), Some("2025-03-09T20:45"));
        assert_eq!(iso("2025-3-9", "").as_deref(), Some("2025-03-09T15:00"));
    }

    #[test]
    fn iso_fallback_and_garbage() {
        assert_eq!(iso("2025-03-09T11:00:00+01:00", "").as_deref(), Some("2025-03-09T11:00"));
        assert_eq!(iso("domenica", "15:00"), None);
        assert_eq!(iso("31/02/2025", ""), None);
        assert_eq!(iso("", "15:00"), None);
    }
}
