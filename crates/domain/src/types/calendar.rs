//! Calendar-facing domain types
//!
//! These types describe what the scheduling layer needs from the external
//! calendar service: the event to mirror, the recurrence descriptor stored
//! on a class, and the session capability threaded into every operation
//! that touches the calendar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repeat frequency of a recurring event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    /// RRULE token for this frequency
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
        }
    }
}

/// Two-letter weekday code as used in RRULE BYDAY lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeekdayCode {
    #[serde(rename = "MO")]
    Mo,
    #[serde(rename = "TU")]
    Tu,
    #[serde(rename = "WE")]
    We,
    #[serde(rename = "TH")]
    Th,
    #[serde(rename = "FR")]
    Fr,
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "SU")]
    Su,
}

impl WeekdayCode {
    /// RRULE token for this weekday
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mo => "MO",
            Self::Tu => "TU",
            Self::We => "WE",
            Self::Th => "TH",
            Self::Fr => "FR",
            Self::Sa => "SA",
            Self::Su => "SU",
        }
    }
}

/// Recurrence descriptor attached to a class
///
/// Persisted as a JSON column on the class row and translated into an
/// RRULE string when the calendar event is created or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub freq: Frequency,
    pub by_day: Vec<WeekdayCode>,
    pub weeks: u32,
}

impl Recurrence {
    /// Scheduled occurrences per week.
    ///
    /// An empty BYDAY list counts as a single weekly occurrence so a
    /// malformed descriptor never zeroes an earnings computation.
    pub fn occurrences_per_week(&self) -> u32 {
        (self.by_day.len() as u32).max(1)
    }
}

/// Payload for creating or updating a calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: Option<String>,
    pub recurrence: Option<Recurrence>,
}

/// An authenticated calendar session
///
/// Obtained from the auth collaborator per operation and passed explicitly
/// into every gateway call; there is no process-wide session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSession {
    pub access_token: String,
    pub account: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_round_trips_through_json() {
        let recurrence = Recurrence {
            freq: Frequency::Weekly,
            by_day: vec![WeekdayCode::Mo, WeekdayCode::We],
            weeks: 6,
        };
        let json = serde_json::to_string(&recurrence).unwrap();
        assert!(json.contains("\"WEEKLY\""));
        assert!(json.contains("\"MO\""));
        let back: Recurrence = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recurrence);
    }

    #[test]
    fn empty_by_day_counts_as_one_occurrence() {
        let recurrence =
            Recurrence { freq: Frequency::Daily, by_day: Vec::new(), weeks: 2 };
        assert_eq!(recurrence.occurrences_per_week(), 1);
    }
}
