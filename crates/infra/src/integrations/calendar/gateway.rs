//! Google Calendar gateway
//!
//! Implements the core `CalendarGateway` port against the Calendar v3
//! REST API. Calls are not retried and run under a bounded timeout, so a
//! calendar outage surfaces as one terminal `Calendar` error per
//! operation. Attendee mutations follow the fetch-modify-write-back
//! contract; event updates replay the current attendee list instead of
//! resetting it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use semester_core::calendar_ports::CalendarGateway;
use semester_domain::{CalendarConfig, CalendarSession, EventRequest, Result, SemesterError};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::payload::{build_event_payload, Attendee};
use crate::http::HttpClient;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Google Calendar API gateway
pub struct GoogleCalendarGateway {
    http: HttpClient,
    api_base: String,
    calendar_id: String,
    time_zone: String,
}

/// Event representation read back from the provider
#[derive(Debug, Deserialize)]
struct RemoteEvent {
    #[allow(dead_code)]
    id: String,
    #[serde(default)]
    attendees: Vec<Attendee>,
}

/// Insert response; only the assigned identifier matters
#[derive(Debug, Deserialize)]
struct CreatedEvent {
    id: String,
}

#[derive(serde::Serialize)]
struct AttendeePatch {
    attendees: Vec<Attendee>,
}

impl GoogleCalendarGateway {
    /// Create a gateway from calendar configuration
    pub fn new(config: &CalendarConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .max_attempts(1)
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            time_zone: config.time_zone.clone(),
        })
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_base, self.calendar_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), event_id)
    }

    async fn expect_success(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_else(|_| "unreadable body".to_string());
        Err(SemesterError::Calendar(format!(
            "calendar API error during {context} ({status}): {body}"
        )))
    }

    async fn fetch_event(
        &self,
        session: &CalendarSession,
        event_id: &str,
    ) -> Result<RemoteEvent> {
        let request = self
            .http
            .request(Method::GET, self.event_url(event_id))
            .bearer_auth(&session.access_token);
        let response = self.http.send(request).await?;
        let response = Self::expect_success(response, "event fetch").await?;
        response.json::<RemoteEvent>().await.map_err(|e| {
            SemesterError::Calendar(format!("failed to parse event response: {e}"))
        })
    }

    async fn write_attendees(
        &self,
        session: &CalendarSession,
        event_id: &str,
        attendees: Vec<Attendee>,
    ) -> Result<()> {
        let request = self
            .http
            .request(Method::PATCH, self.event_url(event_id))
            .bearer_auth(&session.access_token)
            .json(&AttendeePatch { attendees });
        let response = self.http.send(request).await?;
        Self::expect_success(response, "attendee update").await?;
        Ok(())
    }
}

#[async_trait]
impl CalendarGateway for GoogleCalendarGateway {
    #[instrument(skip(self, session, request), fields(summary = %request.summary))]
    async fn create_event(
        &self,
        session: &CalendarSession,
        request: &EventRequest,
    ) -> Result<String> {
        let payload = build_event_payload(request, &self.time_zone, Vec::new());
        let http_request = self
            .http
            .request(Method::POST, self.events_url())
            .bearer_auth(&session.access_token)
            .json(&payload);
        let response = self.http.send(http_request).await?;
        let response = Self::expect_success(response, "event create").await?;

        let created = response.json::<CreatedEvent>().await.map_err(|e| {
            SemesterError::Calendar(format!("failed to parse create response: {e}"))
        })?;
        let event_id = created.id.trim().to_string();
        info!(%event_id, "calendar event created");
        Ok(event_id)
    }

    #[instrument(skip(self, session, request))]
    async fn update_event(
        &self,
        session: &CalendarSession,
        event_id: &str,
        request: &EventRequest,
    ) -> Result<()> {
        // replay the current attendee list so an update never drops
        // existing reservations from the event
        let current = self.fetch_event(session, event_id).await?;
        let payload = build_event_payload(request, &self.time_zone, current.attendees);

        let http_request = self
            .http
            .request(Method::PUT, self.event_url(event_id))
            .bearer_auth(&session.access_token)
            .json(&payload);
        let response = self.http.send(http_request).await?;
        Self::expect_success(response, "event update").await?;
        info!(event_id, "calendar event updated");
        Ok(())
    }

    #[instrument(skip(self, session))]
    async fn delete_event(&self, session: &CalendarSession, event_id: &str) -> Result<()> {
        let request = self
            .http
            .request(Method::DELETE, self.event_url(event_id))
            .bearer_auth(&session.access_token);
        let response = self.http.send(request).await?;
        Self::expect_success(response, "event delete").await?;
        info!(event_id, "calendar event deleted");
        Ok(())
    }

    #[instrument(skip(self, session))]
    async fn add_attendee(
        &self,
        session: &CalendarSession,
        event_id: &str,
        email: &str,
    ) -> Result<Vec<String>> {
        let current = self.fetch_event(session, event_id).await?;
        let mut attendees = current.attendees;

        if attendees.iter().any(|a| a.email == email) {
            debug!(event_id, email, "attendee already present");
        } else {
            attendees.push(Attendee { email: email.to_string() });
            if let Err(err) = self.write_attendees(session, event_id, attendees.clone()).await {
                warn!(event_id, email, error = %err, "attendee add failed");
                return Err(err);
            }
            info!(event_id, email, "attendee added");
        }

        Ok(attendees.into_iter().map(|a| a.email).collect())
    }

    #[instrument(skip(self, session))]
    async fn remove_attendee(
        &self,
        session: &CalendarSession,
        event_id: &str,
        email: &str,
    ) -> Result<Vec<String>> {
        let current = self.fetch_event(session, event_id).await?;
        let mut attendees = current.attendees;

        if let Some(position) = attendees.iter().position(|a| a.email == email) {
            attendees.remove(position);
            if let Err(err) = self.write_attendees(session, event_id, attendees.clone()).await {
                warn!(event_id, email, error = %err, "attendee removal failed");
                return Err(err);
            }
            info!(event_id, email, "attendee removed");
        } else {
            debug!(event_id, email, "attendee not present, nothing to remove");
        }

        Ok(attendees.into_iter().map(|a| a.email).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use semester_domain::{Frequency, Recurrence, WeekdayCode};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer) -> CalendarConfig {
        CalendarConfig {
            api_base: server.uri(),
            calendar_id: "school".into(),
            time_zone: "Europe/Belgrade".into(),
            account: "school@example.com".into(),
        }
    }

    fn session() -> CalendarSession {
        CalendarSession { access_token: "test-token".into(), account: "school@example.com".into() }
    }

    fn event_request() -> EventRequest {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap();
        EventRequest {
            summary: "Algebra".into(),
            start,
            end: start + ChronoDuration::hours(1),
            description: Some("intro".into()),
            recurrence: Some(Recurrence {
                freq: Frequency::Weekly,
                by_day: vec![WeekdayCode::Mo],
                weeks: 2,
            }),
        }
    }

    #[tokio::test]
    async fn create_event_posts_payload_and_returns_trimmed_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/school/events"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "summary": "Algebra",
                "location": "online",
                "colorId": "6",
                "recurrence": ["RRULE:FREQ=WEEKLY;BYDAY=MO;UNTIL=20240614T100000Z"],
                "reminders": {
                    "useDefault": false,
                    "overrides": [
                        {"method": "popup", "minutes": 60},
                        {"method": "email", "minutes": 1440}
                    ]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": " evt-123 "})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        let event_id = gateway.create_event(&session(), &event_request()).await.unwrap();
        assert_eq!(event_id, "evt-123");
    }

    #[tokio::test]
    async fn create_event_failure_is_calendar_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        let err = gateway.create_event(&session(), &event_request()).await.unwrap_err();
        assert!(matches!(err, SemesterError::Calendar(_)));
    }

    #[tokio::test]
    async fn update_event_replays_current_attendees() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/school/events/evt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt-1",
                "attendees": [{"email": "ana@example.com"}, {"email": "ben@example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/calendars/school/events/evt-1"))
            .and(body_partial_json(json!({
                "summary": "Algebra",
                "attendees": [{"email": "ana@example.com"}, {"email": "ben@example.com"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        gateway.update_event(&session(), "evt-1", &event_request()).await.unwrap();
    }

    #[tokio::test]
    async fn add_attendee_appends_and_writes_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/school/events/evt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt-1",
                "attendees": [{"email": "ana@example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/calendars/school/events/evt-1"))
            .and(body_partial_json(json!({
                "attendees": [{"email": "ana@example.com"}, {"email": "ben@example.com"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        let attendees =
            gateway.add_attendee(&session(), "evt-1", "ben@example.com").await.unwrap();
        assert_eq!(attendees, vec!["ana@example.com", "ben@example.com"]);
    }

    #[tokio::test]
    async fn add_attendee_is_idempotent_without_write() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/school/events/evt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt-1",
                "attendees": [{"email": "ana@example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        let attendees =
            gateway.add_attendee(&session(), "evt-1", "ana@example.com").await.unwrap();
        assert_eq!(attendees, vec!["ana@example.com"]);
    }

    #[tokio::test]
    async fn remove_attendee_missing_email_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/school/events/evt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt-1",
                "attendees": [{"email": "ana@example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        let attendees =
            gateway.remove_attendee(&session(), "evt-1", "ghost@example.com").await.unwrap();
        assert_eq!(attendees, vec!["ana@example.com"]);
    }

    #[tokio::test]
    async fn remove_attendee_drops_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/school/events/evt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt-1",
                "attendees": [{"email": "ana@example.com"}, {"email": "ben@example.com"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(body_partial_json(json!({"attendees": [{"email": "ben@example.com"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt-1"})))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        let attendees =
            gateway.remove_attendee(&session(), "evt-1", "ana@example.com").await.unwrap();
        assert_eq!(attendees, vec!["ben@example.com"]);
    }

    #[tokio::test]
    async fn delete_event_accepts_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/school/events/evt-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = GoogleCalendarGateway::new(&config(&server)).unwrap();
        gateway.delete_event(&session(), "evt-1").await.unwrap();
    }
}
