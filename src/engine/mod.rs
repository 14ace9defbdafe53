mod admission;
mod conflict;
mod error;
mod rules;

pub use error::{AdmissionError, EnrollmentError, FailureClass, MeetingConflictError};

use std::sync::Arc;

use ulid::Ulid;

use crate::gateway::{CourseHistoryGateway, EnrollmentLedger, MeetingDirectory, SectionRegistry};
use crate::model::Meeting;
use crate::observability;
use crate::store::MemoryStore;

use conflict::MeetingContext;
use rules::EnrollmentContext;

/// The scheduling and enrollment core. Owns no state of its own — every
/// read and write goes through the collaborator gateways, so the engine can
/// run against the bundled in-memory store or a real persistence layer.
pub struct Engine {
    pub(crate) registry: Arc<dyn SectionRegistry>,
    pub(crate) meetings: Arc<dyn MeetingDirectory>,
    pub(crate) ledger: Arc<dyn EnrollmentLedger>,
    pub(crate) history: Arc<dyn CourseHistoryGateway>,
}

impl Engine {
    pub fn new(
        registry: Arc<dyn SectionRegistry>,
        meetings: Arc<dyn MeetingDirectory>,
        ledger: Arc<dyn EnrollmentLedger>,
        history: Arc<dyn CourseHistoryGateway>,
    ) -> Self {
        Self { registry, meetings, ledger, history }
    }

    /// Engine wired to a fresh [`MemoryStore`]; the store is returned too so
    /// the caller can register entities and inspect state.
    pub fn in_memory() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let engine = Self::new(store.clone(), store.clone(), store.clone(), store.clone());
        (engine, store)
    }

    /// Run the seven meeting checks against persisted state, without
    /// persisting anything. A persisted meeting with the candidate's own id
    /// is excluded from every comparison (update re-validation).
    pub async fn validate_meeting(&self, candidate: &Meeting) -> Result<(), MeetingConflictError> {
        let section = self
            .registry
            .section(candidate.section_id)
            .await
            .ok_or(MeetingConflictError::SectionNotFound(candidate.section_id))?;
        let course = self
            .registry
            .course(section.course_id)
            .await
            .ok_or(MeetingConflictError::CourseNotFound(section.course_id))?;
        let teacher = self
            .registry
            .teacher(section.teacher_id)
            .await
            .ok_or(MeetingConflictError::TeacherNotFound(section.teacher_id))?;

        let section_meetings = self.meetings.for_section(section.id).await;
        let teacher_meetings = self.meetings.for_teacher(section.teacher_id).await;
        let classroom_meetings = self.meetings.for_classroom(section.classroom_id).await;

        let result = conflict::validate_meeting(
            candidate,
            &MeetingContext {
                section: &section,
                course: &course,
                teacher: &teacher,
                section_meetings: &section_meetings,
                teacher_meetings: &teacher_meetings,
                classroom_meetings: &classroom_meetings,
            },
        );
        if let Err(ref e) = result {
            metrics::counter!(
                observability::MEETING_REJECTIONS_TOTAL,
                "rule" => observability::meeting_rejection_label(e)
            )
            .increment(1);
            tracing::debug!(meeting_id = %candidate.id, error = %e, "meeting rejected");
        }
        result
    }

    /// Validate, then persist. No side effect happens before all checks pass.
    pub async fn add_meeting(&self, candidate: Meeting) -> Result<(), MeetingConflictError> {
        self.validate_meeting(&candidate).await?;
        self.meetings.insert(candidate).await;
        Ok(())
    }

    /// Run the enrollment rule chain against a fresh snapshot, without
    /// admitting. Advisory: the authoritative run happens inside
    /// [`Engine::admit_enrollment`].
    pub async fn validate_enrollment(
        &self,
        student_id: Ulid,
        section_id: Ulid,
    ) -> Result<(), EnrollmentError> {
        let (student, section, course) = self.enrollment_snapshot(student_id, section_id).await?;
        let result = self
            .run_rule_chain(&EnrollmentContext {
                student: &student,
                section: &section,
                course: &course,
            })
            .await;
        if let Err(ref e) = result {
            metrics::counter!(
                observability::ENROLLMENT_REJECTIONS_TOTAL,
                "rule" => observability::enrollment_rejection_label(e)
            )
            .increment(1);
            tracing::debug!(%student_id, %section_id, error = %e, "enrollment rejected");
        }
        result
    }

    /// Whether an enrollment attempt would currently pass the rule chain.
    pub async fn can_enroll(&self, student_id: Ulid, section_id: Ulid) -> bool {
        self.validate_enrollment(student_id, section_id).await.is_ok()
    }

    pub(crate) async fn enrollment_snapshot(
        &self,
        student_id: Ulid,
        section_id: Ulid,
    ) -> Result<(crate::model::Student, crate::model::Section, crate::model::Course), EnrollmentError>
    {
        let student = self
            .registry
            .student(student_id)
            .await
            .ok_or(EnrollmentError::StudentNotFound(student_id))?;
        let section = self
            .registry
            .section(section_id)
            .await
            .ok_or(EnrollmentError::SectionNotFound(section_id))?;
        let course = self
            .registry
            .course(section.course_id)
            .await
            .ok_or(EnrollmentError::CourseNotFound(section.course_id))?;
        Ok((student, section, course))
    }
}
