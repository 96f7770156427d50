//! Calendar integration port interfaces
//!
//! These traits define the boundary between the scheduling/reservation
//! logic and the external calendar service. Implementations live in the
//! infrastructure layer; tests substitute fakes.

use async_trait::async_trait;
use semester_domain::{CalendarSession, EventRequest, Result};

/// Trait for mirroring scheduling state into the external calendar
///
/// Every operation talks to the external service and may fail with
/// `SemesterError::Calendar`; callers decide whether to abort (the
/// scheduling and reservation engines always do).
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Create an event and return the provider-assigned event identifier.
    async fn create_event(
        &self,
        session: &CalendarSession,
        request: &EventRequest,
    ) -> Result<String>;

    /// Update an existing event in place, preserving its attendee list.
    async fn update_event(
        &self,
        session: &CalendarSession,
        event_id: &str,
        request: &EventRequest,
    ) -> Result<()>;

    /// Delete an event.
    async fn delete_event(&self, session: &CalendarSession, event_id: &str) -> Result<()>;

    /// Add an attendee email to an event, idempotently.
    ///
    /// Returns the attendee list after the call.
    async fn add_attendee(
        &self,
        session: &CalendarSession,
        event_id: &str,
        email: &str,
    ) -> Result<Vec<String>>;

    /// Remove an attendee email from an event.
    ///
    /// A missing email is a no-op, not an error. Returns the attendee list
    /// after the call.
    async fn remove_attendee(
        &self,
        session: &CalendarSession,
        event_id: &str,
        email: &str,
    ) -> Result<Vec<String>>;
}

/// Trait for the auth collaborator that owns calendar credentials
///
/// The single capability the core needs: `None` means no valid session,
/// which every calendar-touching operation surfaces as `Unauthorized`.
#[async_trait]
pub trait CalendarSessions: Send + Sync {
    /// Current session, if the user is logged in.
    async fn session(&self) -> Result<Option<CalendarSession>>;
}
