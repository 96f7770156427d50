//! Scheduling service - class lifecycle with calendar mirroring
//!
//! A class goes Proposed -> Confirmed (calendar event created, row
//! persisted) -> zero or more updates -> Deleted. The calendar side effect
//! always runs before the local mutation; a calendar failure aborts the
//! operation with no local write. The two are not one atomic transaction,
//! so failures after the calendar call are logged with enough detail for
//! out-of-band reconciliation.

use std::sync::Arc;

use semester_domain::{
    CalendarSession, Class, ClassFilter, ClassUpdate, EventRequest, NewClass, Page, Result,
    SemesterError, Teacher,
};
use tracing::{error, info, instrument};

use super::ports::ClassRepository;
use crate::calendar_ports::{CalendarGateway, CalendarSessions};
use crate::directory::ports::TeacherRepository;

/// Scheduling service
pub struct SchedulingService {
    classes: Arc<dyn ClassRepository>,
    teachers: Arc<dyn TeacherRepository>,
    gateway: Arc<dyn CalendarGateway>,
    sessions: Arc<dyn CalendarSessions>,
}

impl SchedulingService {
    /// Create a new scheduling service
    pub fn new(
        classes: Arc<dyn ClassRepository>,
        teachers: Arc<dyn TeacherRepository>,
        gateway: Arc<dyn CalendarGateway>,
        sessions: Arc<dyn CalendarSessions>,
    ) -> Self {
        Self { classes, teachers, gateway, sessions }
    }

    async fn require_session(&self) -> Result<CalendarSession> {
        self.sessions
            .session()
            .await?
            .ok_or_else(|| SemesterError::Unauthorized("calendar login required".into()))
    }

    /// Schedule a new class and mirror it as a calendar event
    ///
    /// The row is only inserted after the calendar create call confirmed an
    /// event id; a gateway failure leaves nothing persisted.
    #[instrument(skip(self, class), fields(name = %class.name))]
    pub async fn create_class(&self, class: NewClass) -> Result<Class> {
        let session = self.require_session().await?;

        if self
            .classes
            .find_by_signature(&class.name, class.start, class.end)
            .await?
            .is_some()
        {
            return Err(SemesterError::Conflict(format!(
                "class '{}' already scheduled for that time",
                class.name
            )));
        }

        let request = EventRequest {
            summary: class.name.clone(),
            start: class.start,
            end: class.end,
            description: class.description.clone(),
            recurrence: class.recurrence.clone(),
        };
        let event_id = self.gateway.create_event(&session, &request).await?;
        info!(%event_id, "calendar event created");

        let class = self.classes.insert(class, &event_id).await;
        if let Err(ref err) = class {
            error!(
                %event_id,
                error = %err,
                "class insert failed after calendar create; event needs reconciliation"
            );
        }
        class
    }

    /// Update class fields and the mirrored calendar event
    ///
    /// The update targets the existing event id and keeps the existing
    /// recurrence; the gateway preserves the event's attendee list. A
    /// gateway failure aborts before the row mutation.
    #[instrument(skip(self, update))]
    pub async fn update_class(&self, id: i64, update: ClassUpdate) -> Result<Class> {
        let session = self.require_session().await?;

        let existing = self
            .classes
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("class id {id}")))?;

        let request = EventRequest {
            summary: update.name.clone().unwrap_or_else(|| existing.name.clone()),
            start: update.start.unwrap_or(existing.start),
            end: update.end.unwrap_or(existing.end),
            description: update.description.clone().or_else(|| existing.description.clone()),
            recurrence: existing.recurrence.clone(),
        };
        self.gateway.update_event(&session, &existing.event_id, &request).await?;

        if !self.classes.update(id, update).await? {
            error!(
                event_id = %existing.event_id,
                "class row vanished after calendar update; event needs reconciliation"
            );
            return Err(SemesterError::NotFound(format!("class id {id}")));
        }
        self.classes
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("class id {id}")))
    }

    /// Delete a class, its calendar event, and all dependent records
    ///
    /// The calendar delete runs first; if it fails the row is preserved so
    /// no orphaned calendar event can outlive its class. On success the
    /// class row, its invoices, and its reservations go in one unit of
    /// work.
    #[instrument(skip(self))]
    pub async fn delete_class(&self, id: i64) -> Result<()> {
        let session = self.require_session().await?;

        let class = self
            .classes
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("class id {id}")))?;

        self.gateway.delete_event(&session, &class.event_id).await?;

        let result = self.classes.delete_cascade(id).await;
        if let Err(ref err) = result {
            error!(
                event_id = %class.event_id,
                error = %err,
                "local delete failed after calendar delete; event is gone, row remains"
            );
        } else {
            info!(event_id = %class.event_id, "class and calendar event deleted");
        }
        result
    }

    /// Load one class
    pub async fn get_class(&self, id: i64) -> Result<Class> {
        self.classes
            .find(id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("class id {id}")))
    }

    /// List classes, filtered and paginated
    pub async fn list_classes(&self, filter: &ClassFilter, page: Page) -> Result<Vec<Class>> {
        self.classes.list(filter, page).await
    }

    /// All classes owned by a teacher
    ///
    /// `NotFound` when the teacher id does not exist.
    pub async fn teacher_classes(&self, teacher_id: i64) -> Result<(Teacher, Vec<Class>)> {
        let teacher = self
            .teachers
            .find(teacher_id)
            .await?
            .ok_or_else(|| SemesterError::NotFound(format!("teacher id {teacher_id}")))?;
        let classes = self.classes.list_for_teacher(teacher_id).await?;
        Ok((teacher, classes))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use semester_domain::{Frequency, Recurrence, WeekdayCode};

    use super::*;
    use crate::testing::{
        new_class, new_teacher, FixedSessions, GatewayCall, InMemoryClasses, InMemoryTeachers,
        RecordingGateway,
    };

    struct Fixture {
        service: SchedulingService,
        classes: Arc<InMemoryClasses>,
        gateway: Arc<RecordingGateway>,
    }

    fn fixture_with_sessions(sessions: FixedSessions) -> Fixture {
        let classes = Arc::new(InMemoryClasses::default());
        let teachers = Arc::new(InMemoryTeachers::default());
        let gateway = Arc::new(RecordingGateway::default());
        let service = SchedulingService::new(
            classes.clone(),
            teachers.clone(),
            gateway.clone(),
            Arc::new(sessions),
        );
        Fixture { service, classes, gateway }
    }

    fn fixture() -> Fixture {
        fixture_with_sessions(FixedSessions::logged_in())
    }

    #[tokio::test]
    async fn create_class_persists_gateway_event_id() {
        let fixture = fixture();
        let class = fixture.service.create_class(new_class("Algebra", 10)).await.unwrap();

        assert_eq!(class.event_id, "evt-1");
        let stored = fixture.classes.find(class.id).await.unwrap().unwrap();
        assert_eq!(stored.event_id, "evt-1");
    }

    #[tokio::test]
    async fn create_class_without_session_is_unauthorized() {
        let fixture = fixture_with_sessions(FixedSessions::logged_out());
        let err = fixture.service.create_class(new_class("Algebra", 10)).await.unwrap_err();
        assert!(matches!(err, SemesterError::Unauthorized(_)));
        assert!(fixture.gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn create_class_aborts_without_row_when_gateway_fails() {
        let fixture = fixture();
        fixture.gateway.fail_next(SemesterError::Calendar("timeout".into()));

        let err = fixture.service.create_class(new_class("Algebra", 10)).await.unwrap_err();
        assert!(matches!(err, SemesterError::Calendar(_)));
        assert!(fixture.classes.is_empty());
    }

    #[tokio::test]
    async fn duplicate_signature_is_conflict_before_gateway_call() {
        let fixture = fixture();
        fixture.service.create_class(new_class("Algebra", 10)).await.unwrap();
        let call_count = fixture.gateway.calls().len();

        let err = fixture.service.create_class(new_class("Algebra", 10)).await.unwrap_err();
        assert!(matches!(err, SemesterError::Conflict(_)));
        assert_eq!(fixture.gateway.calls().len(), call_count);
    }

    #[tokio::test]
    async fn update_class_reuses_event_id_and_recurrence() {
        let fixture = fixture();
        let mut spec = new_class("Algebra", 10);
        spec.recurrence = Some(Recurrence {
            freq: Frequency::Weekly,
            by_day: vec![WeekdayCode::Tu],
            weeks: 4,
        });
        let class = fixture.service.create_class(spec).await.unwrap();

        let updated = fixture
            .service
            .update_class(
                class.id,
                ClassUpdate { name: Some("Algebra II".into()), ..Default::default() },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Algebra II");
        assert_eq!(updated.event_id, class.event_id);
        assert_eq!(updated.recurrence, class.recurrence);

        let calls = fixture.gateway.calls();
        match calls.last().unwrap() {
            GatewayCall::Update { event_id, request } => {
                assert_eq!(event_id, &class.event_id);
                assert_eq!(request.summary, "Algebra II");
                assert_eq!(request.recurrence, class.recurrence);
            }
            other => panic!("expected update call, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_aborts_row_mutation_when_gateway_fails() {
        let fixture = fixture();
        let class = fixture.service.create_class(new_class("Algebra", 10)).await.unwrap();

        fixture.gateway.fail_next(SemesterError::Calendar("503".into()));
        let err = fixture
            .service
            .update_class(
                class.id,
                ClassUpdate { name: Some("Renamed".into()), ..Default::default() },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SemesterError::Calendar(_)));
        let stored = fixture.classes.find(class.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Algebra");
    }

    #[tokio::test]
    async fn delete_preserves_row_when_gateway_fails() {
        let fixture = fixture();
        let class = fixture.service.create_class(new_class("Algebra", 10)).await.unwrap();

        fixture.gateway.fail_next(SemesterError::Calendar("500".into()));
        let err = fixture.service.delete_class(class.id).await.unwrap_err();

        assert!(matches!(err, SemesterError::Calendar(_)));
        assert!(fixture.classes.find(class.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_removes_row_and_event() {
        let fixture = fixture();
        let class = fixture.service.create_class(new_class("Algebra", 10)).await.unwrap();

        fixture.service.delete_class(class.id).await.unwrap();

        assert!(fixture.classes.find(class.id).await.unwrap().is_none());
        assert!(matches!(
            fixture.gateway.calls().last().unwrap(),
            GatewayCall::Delete { event_id } if event_id == &class.event_id
        ));
    }

    #[tokio::test]
    async fn teacher_classes_requires_existing_teacher() {
        let fixture = fixture();
        let err = fixture.service.teacher_classes(7).await.unwrap_err();
        assert!(matches!(err, SemesterError::NotFound(_)));
    }

    #[tokio::test]
    async fn teacher_classes_lists_owned_classes() {
        let classes = Arc::new(InMemoryClasses::default());
        let teachers = Arc::new(InMemoryTeachers::default());
        let gateway = Arc::new(RecordingGateway::default());
        let service = SchedulingService::new(
            classes.clone(),
            teachers.clone(),
            gateway,
            Arc::new(FixedSessions::logged_in()),
        );

        let teacher = teachers.insert(new_teacher("t@example.com", 18.0)).await.unwrap();
        let mut spec = new_class("Geometry", 8);
        spec.teacher_id = teacher.id;
        spec.start = Utc.with_ymd_and_hms(2024, 9, 2, 10, 0, 0).unwrap();
        spec.end = Utc.with_ymd_and_hms(2024, 9, 2, 11, 0, 0).unwrap();
        service.create_class(spec).await.unwrap();

        let (owner, owned) = service.teacher_classes(teacher.id).await.unwrap();
        assert_eq!(owner.id, teacher.id);
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].name, "Geometry");
    }
}
