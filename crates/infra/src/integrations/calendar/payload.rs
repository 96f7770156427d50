//! Calendar event wire payloads and recurrence-rule construction
//!
//! Every event carries a recurrence rule: classes with a descriptor get a
//! bounded weekly/daily series, everything else a single occurrence. The
//! series end is `start + (weeks - 1) weeks + 4 days`, which closes the
//! final school week regardless of which weekday the series starts on.

use chrono::{DateTime, Duration, Utc};
use semester_domain::{EventRequest, Recurrence};
use serde::{Deserialize, Serialize};

/// Fixed location stamped on every event
const EVENT_LOCATION: &str = "online";
/// Fixed calendar color tag
const EVENT_COLOR_ID: &str = "6";
/// Pop-up reminder lead time, minutes
const POPUP_REMINDER_MINUTES: u32 = 60;
/// Email reminder lead time, minutes (24 hours)
const EMAIL_REMINDER_MINUTES: u32 = 1_440;

/// Full event body sent on insert and update
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub summary: String,
    pub location: String,
    pub description: String,
    #[serde(rename = "colorId")]
    pub color_id: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub recurrence: Vec<String>,
    pub attendees: Vec<Attendee>,
    pub reminders: Reminders,
}

/// Start/end timestamp with explicit time zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// One attendee entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
}

/// Reminder configuration: defaults off, two fixed overrides
#[derive(Debug, Clone, Serialize)]
pub struct Reminders {
    #[serde(rename = "useDefault")]
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

/// A single reminder override
#[derive(Debug, Clone, Serialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

/// Build the RRULE string for an event
///
/// With a descriptor: `RRULE:FREQ=<freq>;BYDAY=<days>;UNTIL=<end>` where
/// the UNTIL timestamp is UTC-formatted `%Y%m%dT%H%M%SZ`. Without one,
/// a single occurrence: `RRULE:FREQ=DAILY;COUNT=1`.
pub fn recurrence_rule(start: DateTime<Utc>, recurrence: Option<&Recurrence>) -> String {
    match recurrence {
        Some(descriptor) => {
            let until = start
                + Duration::weeks(i64::from(descriptor.weeks.saturating_sub(1)))
                + Duration::days(4);
            let by_day: Vec<&str> =
                descriptor.by_day.iter().map(|day| day.as_str()).collect();
            format!(
                "RRULE:FREQ={};BYDAY={};UNTIL={}",
                descriptor.freq.as_str(),
                by_day.join(","),
                until.format("%Y%m%dT%H%M%SZ")
            )
        }
        None => "RRULE:FREQ=DAILY;COUNT=1".to_string(),
    }
}

/// Build the full event payload for insert or update
pub fn build_event_payload(
    request: &EventRequest,
    time_zone: &str,
    attendees: Vec<Attendee>,
) -> EventPayload {
    EventPayload {
        summary: request.summary.clone(),
        location: EVENT_LOCATION.to_string(),
        description: request.description.clone().unwrap_or_default(),
        color_id: EVENT_COLOR_ID.to_string(),
        start: EventDateTime {
            date_time: request.start.to_rfc3339(),
            time_zone: time_zone.to_string(),
        },
        end: EventDateTime {
            date_time: request.end.to_rfc3339(),
            time_zone: time_zone.to_string(),
        },
        recurrence: vec![recurrence_rule(request.start, request.recurrence.as_ref())],
        attendees,
        reminders: Reminders {
            use_default: false,
            overrides: vec![
                ReminderOverride { method: "popup".into(), minutes: POPUP_REMINDER_MINUTES },
                ReminderOverride { method: "email".into(), minutes: EMAIL_REMINDER_MINUTES },
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use semester_domain::{Frequency, WeekdayCode};

    use super::*;

    fn start() -> DateTime<Utc> {
        // Monday 2024-06-03 10:00 UTC
        Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap()
    }

    #[test]
    fn weekly_rule_computes_until_from_weeks() {
        let recurrence = Recurrence {
            freq: Frequency::Weekly,
            by_day: vec![WeekdayCode::Mo, WeekdayCode::We],
            weeks: 6,
        };
        let rule = recurrence_rule(start(), Some(&recurrence));
        // start + 5 weeks + 4 days = 2024-07-12 10:00
        assert_eq!(rule, "RRULE:FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20240712T100000Z");
    }

    #[test]
    fn single_week_series_ends_four_days_after_start() {
        let recurrence =
            Recurrence { freq: Frequency::Daily, by_day: vec![WeekdayCode::Mo], weeks: 1 };
        let rule = recurrence_rule(start(), Some(&recurrence));
        assert_eq!(rule, "RRULE:FREQ=DAILY;BYDAY=MO;UNTIL=20240607T100000Z");
    }

    #[test]
    fn missing_descriptor_yields_single_occurrence() {
        assert_eq!(recurrence_rule(start(), None), "RRULE:FREQ=DAILY;COUNT=1");
    }

    #[test]
    fn payload_carries_fixed_fields_and_reminders() {
        let request = EventRequest {
            summary: "Algebra".into(),
            start: start(),
            end: start() + Duration::hours(1),
            description: Some("intro".into()),
            recurrence: None,
        };
        let payload = build_event_payload(&request, "Europe/Belgrade", Vec::new());

        assert_eq!(payload.location, "online");
        assert_eq!(payload.color_id, "6");
        assert_eq!(payload.start.time_zone, "Europe/Belgrade");
        assert_eq!(payload.recurrence, vec!["RRULE:FREQ=DAILY;COUNT=1".to_string()]);
        assert!(!payload.reminders.use_default);
        assert_eq!(payload.reminders.overrides.len(), 2);
        assert_eq!(payload.reminders.overrides[0].method, "popup");
        assert_eq!(payload.reminders.overrides[0].minutes, 60);
        assert_eq!(payload.reminders.overrides[1].method, "email");
        assert_eq!(payload.reminders.overrides[1].minutes, 1440);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["colorId"], "6");
        assert_eq!(json["reminders"]["useDefault"], false);
        assert_eq!(json["start"]["timeZone"], "Europe/Belgrade");
    }
}
