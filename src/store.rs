use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;

use crate::gateway::{CourseHistoryGateway, EnrollmentLedger, MeetingDirectory, SectionRegistry};
use crate::limits::MAX_SECTION_CAPACITY;
use crate::model::*;

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    AlreadyExists(Ulid),
    CapacityOutOfRange { capacity: u32, max: u32 },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::AlreadyExists(id) => write!(f, "already registered: {id}"),
            StoreError::CapacityOutOfRange { capacity, max } => {
                write!(f, "section capacity {capacity} exceeds the allowed maximum {max}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// In-memory backing store implementing all four gateways. Each map is a
/// sharded [`DashMap`]; the section CAS runs under a single `get_mut` entry
/// guard, so the version check and the write are atomic.
#[derive(Default)]
pub struct MemoryStore {
    sections: DashMap<Ulid, Section>,
    courses: DashMap<Ulid, Course>,
    teachers: DashMap<Ulid, Teacher>,
    students: DashMap<Ulid, Student>,
    meetings: DashMap<Ulid, Meeting>,
    enrollments: DashMap<Ulid, Enrollment>,
    /// Keyed by (student, course, semester).
    history: DashMap<(Ulid, Ulid, Ulid), HistoryRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration (fixture/service side, not used by the engine) ──

    pub fn register_course(&self, course: Course) -> Result<(), StoreError> {
        if self.courses.contains_key(&course.id) {
            return Err(StoreError::AlreadyExists(course.id));
        }
        self.courses.insert(course.id, course);
        Ok(())
    }

    pub fn register_teacher(&self, teacher: Teacher) -> Result<(), StoreError> {
        if self.teachers.contains_key(&teacher.id) {
            return Err(StoreError::AlreadyExists(teacher.id));
        }
        self.teachers.insert(teacher.id, teacher);
        Ok(())
    }

    pub fn register_student(&self, student: Student) -> Result<(), StoreError> {
        if self.students.contains_key(&student.id) {
            return Err(StoreError::AlreadyExists(student.id));
        }
        self.students.insert(student.id, student);
        Ok(())
    }

    pub fn register_section(&self, section: Section) -> Result<(), StoreError> {
        if section.capacity > MAX_SECTION_CAPACITY {
            return Err(StoreError::CapacityOutOfRange {
                capacity: section.capacity,
                max: MAX_SECTION_CAPACITY,
            });
        }
        if self.sections.contains_key(&section.id) {
            return Err(StoreError::AlreadyExists(section.id));
        }
        self.sections.insert(section.id, section);
        Ok(())
    }

    pub fn section_snapshot(&self, id: &Ulid) -> Option<Section> {
        self.sections.get(id).map(|e| e.value().clone())
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    fn teacher_of_section(&self, section_id: &Ulid) -> Option<Ulid> {
        self.sections.get(section_id).map(|s| s.teacher_id)
    }

    fn classroom_of_section(&self, section_id: &Ulid) -> Option<Ulid> {
        self.sections.get(section_id).map(|s| s.classroom_id)
    }

    fn course_of_section(&self, section_id: &Ulid) -> Option<Ulid> {
        self.sections.get(section_id).map(|s| s.course_id)
    }
}

#[async_trait]
impl SectionRegistry for MemoryStore {
    async fn section(&self, id: Ulid) -> Option<Section> {
        self.sections.get(&id).map(|e| e.value().clone())
    }

    async fn course(&self, id: Ulid) -> Option<Course> {
        self.courses.get(&id).map(|e| e.value().clone())
    }

    async fn teacher(&self, id: Ulid) -> Option<Teacher> {
        self.teachers.get(&id).map(|e| e.value().clone())
    }

    async fn student(&self, id: Ulid) -> Option<Student> {
        self.students.get(&id).map(|e| e.value().clone())
    }

    async fn store_section_if_version(&self, mut section: Section, expected_version: u64) -> bool {
        match self.sections.get_mut(&section.id) {
            Some(mut entry) if entry.version == expected_version => {
                section.version = expected_version + 1;
                *entry = section;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl MeetingDirectory for MemoryStore {
    async fn for_section(&self, section_id: Ulid) -> Vec<Meeting> {
        self.meetings
            .iter()
            .filter(|m| m.section_id == section_id)
            .map(|m| m.value().clone())
            .collect()
    }

    async fn for_teacher(&self, teacher_id: Ulid) -> Vec<Meeting> {
        self.meetings
            .iter()
            .filter(|m| self.teacher_of_section(&m.section_id) == Some(teacher_id))
            .map(|m| m.value().clone())
            .collect()
    }

    async fn for_classroom(&self, classroom_id: Ulid) -> Vec<Meeting> {
        self.meetings
            .iter()
            .filter(|m| self.classroom_of_section(&m.section_id) == Some(classroom_id))
            .map(|m| m.value().clone())
            .collect()
    }

    async fn insert(&self, meeting: Meeting) {
        self.meetings.insert(meeting.id, meeting);
    }
}

#[async_trait]
impl EnrollmentLedger for MemoryStore {
    async fn active_for_student(&self, student_id: Ulid, semester_id: Ulid) -> Vec<Enrollment> {
        self.enrollments
            .iter()
            .filter(|e| {
                e.student_id == student_id && e.semester_id == semester_id && e.is_active()
            })
            .map(|e| e.value().clone())
            .collect()
    }

    async fn is_enrolled_in_course(
        &self,
        student_id: Ulid,
        course_id: Ulid,
        semester_id: Ulid,
    ) -> bool {
        self.enrollments.iter().any(|e| {
            e.student_id == student_id
                && e.semester_id == semester_id
                && e.is_active()
                && self.course_of_section(&e.section_id) == Some(course_id)
        })
    }

    async fn active_count(&self, student_id: Ulid, semester_id: Ulid) -> usize {
        self.enrollments
            .iter()
            .filter(|e| {
                e.student_id == student_id && e.semester_id == semester_id && e.is_active()
            })
            .count()
    }

    async fn get(&self, enrollment_id: Ulid) -> Option<Enrollment> {
        self.enrollments.get(&enrollment_id).map(|e| e.value().clone())
    }

    async fn insert(&self, enrollment: Enrollment) {
        self.enrollments.insert(enrollment.id, enrollment);
    }

    async fn remove(&self, enrollment_id: Ulid) -> Option<Enrollment> {
        self.enrollments.remove(&enrollment_id).map(|(_, e)| e)
    }

    async fn set_status_if(
        &self,
        enrollment_id: Ulid,
        expected: EnrollmentStatus,
        next: EnrollmentStatus,
    ) -> bool {
        match self.enrollments.get_mut(&enrollment_id) {
            Some(mut entry) if entry.status == expected => {
                entry.status = next;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl CourseHistoryGateway for MemoryStore {
    async fn has_passed(&self, student_id: Ulid, course_id: Ulid) -> bool {
        self.history.iter().any(|h| {
            h.student_id == student_id
                && h.course_id == course_id
                && h.status == HistoryStatus::Passed
        })
    }

    async fn record(&self, entry: HistoryRecord) {
        self.history
            .insert((entry.student_id, entry.course_id, entry.semester_id), entry);
    }
}
