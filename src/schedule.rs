//! Date/time rules shared by every view.
//!
//! A consultation's `date` + `time` strings are merged into one local
//! wall-clock instant here and nowhere else, so list grouping, badge
//! counts and the details screen agree on what "upcoming" means.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Consultation, ConsultationCategory, DATE_FORMAT, TIME_FORMAT};

// ═══════════════════════════════════════════
// Parsing & comparison
// ═══════════════════════════════════════════

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).ok()
}

/// Combined local instant of a consultation, `None` if either field is malformed.
pub fn consultation_instant(c: &Consultation) -> Option<NaiveDateTime> {
    Some(parse_date(&c.date)?.and_time(parse_time(&c.time)?))
}

/// Zero-padded `(date, time)` pair used for ordering.
///
/// Fields that parse are re-encoded, so `9:00` orders as `09:00`. Fields
/// that don't parse keep their raw text.
fn sort_key(c: &Consultation) -> (Cow<'_, str>, Cow<'_, str>) {
    let date = match parse_date(&c.date) {
        Some(d) => Cow::Owned(d.format(DATE_FORMAT).to_string()),
        None => Cow::Borrowed(c.date.as_str()),
    };
    let time = match parse_time(&c.time) {
        Some(t) => Cow::Owned(t.format(TIME_FORMAT).to_string()),
        None => Cow::Borrowed(c.time.as_str()),
    };
    (date, time)
}

/// Chronological order of two consultations by `(date, time)`.
pub fn chronological(a: &Consultation, b: &Consultation) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// True when the consultation's instant is at or after `now`.
/// A malformed record never counts as upcoming.
pub fn starts_at_or_after(c: &Consultation, now: NaiveDateTime) -> bool {
    consultation_instant(c).is_some_and(|at| at >= now)
}

// ═══════════════════════════════════════════
// Categorization
// ═══════════════════════════════════════════

/// Exactly one category per record: canceled wins, then the time boundary
/// (inclusive on the upcoming side).
pub fn categorize(c: &Consultation, now: NaiveDateTime) -> ConsultationCategory {
    if c.canceled {
        ConsultationCategory::Canceled
    } else if starts_at_or_after(c, now) {
        ConsultationCategory::Upcoming
    } else {
        ConsultationCategory::Past
    }
}

pub fn is_upcoming(c: &Consultation, now: NaiveDateTime) -> bool {
    categorize(c, now) == ConsultationCategory::Upcoming
}

pub fn is_past(c: &Consultation, now: NaiveDateTime) -> bool {
    categorize(c, now) == ConsultationCategory::Past
}

/// Cancellation is terminal: a canceled record can't be moved.
/// Past records stay reschedulable.
pub fn can_reschedule(c: &Consultation) -> bool {
    !c.canceled
}

pub fn can_cancel(c: &Consultation) -> bool {
    !c.canceled
}

// ═══════════════════════════════════════════
// Entry validation
// ═══════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Cannot schedule a consultation on a past date")]
    DateInPast,

    #[error("Cannot schedule a consultation for a time in the past")]
    TimeInPast,
}

/// Checks a date/time picked on the form against `now`.
///
/// Dates before today are rejected. On today the time (to the minute)
/// must be strictly after the current moment.
pub fn validate_entry(
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), EntryError> {
    let today = now.date();
    if date < today {
        return Err(EntryError::DateInPast);
    }
    if date == today {
        let minute = time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time);
        if date.and_time(minute) <= now {
            return Err(EntryError::TimeInPast);
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════
// Presentation helpers
// ═══════════════════════════════════════════

/// `DD/MM` within the current year, `DD/MM/YYYY` otherwise.
/// Malformed input is returned unchanged.
pub fn format_display_date(date: &str, today: NaiveDate) -> String {
    match parse_date(date) {
        Some(d) if d.year() == today.year() => d.format("%d/%m").to_string(),
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => date.to_string(),
    }
}

/// Heading of a day group, relative to today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum SectionTitle {
    Today,
    Tomorrow,
    Yesterday,
    Day(NaiveDate),
    /// Group key that does not parse as a date.
    Undated(String),
}

impl SectionTitle {
    pub fn for_date(date: &str, today: NaiveDate) -> Self {
        let Some(d) = parse_date(date) else {
            return Self::Undated(date.to_string());
        };
        if d == today {
            Self::Today
        } else if today.succ_opt() == Some(d) {
            Self::Tomorrow
        } else if today.pred_opt() == Some(d) {
            Self::Yesterday
        } else {
            Self::Day(d)
        }
    }

    /// English label, e.g. "Tomorrow" or "Saturday, 16 August".
    pub fn label(&self) -> String {
        match self {
            Self::Today => "Today".to_string(),
            Self::Tomorrow => "Tomorrow".to_string(),
            Self::Yesterday => "Yesterday".to_string(),
            Self::Day(d) => d.format("%A, %d %B").to_string(),
            Self::Undated(raw) => raw.clone(),
        }
    }
}
