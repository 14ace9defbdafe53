//! Collaborator gateways. The engine never talks to a persistence layer
//! directly; it reads and writes through these traits. The crate ships one
//! in-memory implementation ([`crate::store::MemoryStore`]); a service layer
//! can substitute its own.

use async_trait::async_trait;
use ulid::Ulid;

use crate::model::{Enrollment, EnrollmentStatus, HistoryRecord, Meeting};
use crate::model::{Course, Section, Student, Teacher};

/// Entity lookups plus the conditioned section write used for admission.
#[async_trait]
pub trait SectionRegistry: Send + Sync {
    async fn section(&self, id: Ulid) -> Option<Section>;
    async fn course(&self, id: Ulid) -> Option<Course>;
    async fn teacher(&self, id: Ulid) -> Option<Teacher>;
    async fn student(&self, id: Ulid) -> Option<Student>;

    /// Compare-and-swap on the section's version token. The write is accepted
    /// only if the stored row still carries `expected_version`; the accepted
    /// row is stored with `expected_version + 1`. Returns whether the write
    /// was accepted.
    async fn store_section_if_version(&self, section: Section, expected_version: u64) -> bool;
}

/// Read access to persisted meetings, scanned by the conflict validator.
#[async_trait]
pub trait MeetingDirectory: Send + Sync {
    async fn for_section(&self, section_id: Ulid) -> Vec<Meeting>;
    /// All meetings of sections taught by this teacher, any semester.
    async fn for_teacher(&self, teacher_id: Ulid) -> Vec<Meeting>;
    /// All meetings held in this classroom, any semester.
    async fn for_classroom(&self, classroom_id: Ulid) -> Vec<Meeting>;
    /// Persist a validated meeting. Replaces an existing meeting with the
    /// same id (the update case).
    async fn insert(&self, meeting: Meeting);
}

/// Enrollment records for the current semesters.
#[async_trait]
pub trait EnrollmentLedger: Send + Sync {
    /// Active (ENROLLED) records of one student in one semester.
    async fn active_for_student(&self, student_id: Ulid, semester_id: Ulid) -> Vec<Enrollment>;
    /// Whether the student holds an active record for this course, in any
    /// section, in this semester.
    async fn is_enrolled_in_course(
        &self,
        student_id: Ulid,
        course_id: Ulid,
        semester_id: Ulid,
    ) -> bool;
    /// Count of active records of one student in one semester.
    async fn active_count(&self, student_id: Ulid, semester_id: Ulid) -> usize;
    async fn get(&self, enrollment_id: Ulid) -> Option<Enrollment>;
    async fn insert(&self, enrollment: Enrollment);
    /// Discard a record, e.g. the losing write of a contended admission.
    async fn remove(&self, enrollment_id: Ulid) -> Option<Enrollment>;
    /// Flip the record's status, conditioned on its current value. Returns
    /// whether this call performed the transition; false when the record is
    /// missing or another caller got there first.
    async fn set_status_if(
        &self,
        enrollment_id: Ulid,
        expected: EnrollmentStatus,
        next: EnrollmentStatus,
    ) -> bool;
}

/// Historical course outcomes. Read-only from the engine's perspective;
/// `record` exists so fixtures and the surrounding service can seed it.
#[async_trait]
pub trait CourseHistoryGateway: Send + Sync {
    /// Whether the student holds a PASSED record for the course, any semester.
    async fn has_passed(&self, student_id: Ulid, course_id: Ulid) -> bool;
    async fn record(&self, entry: HistoryRecord);
}
