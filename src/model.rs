use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Minutes since midnight — the only time-of-day type.
pub type Minutes = u16;

/// Round a minute total up to whole hours. All weekly/daily hour budgets
/// are compared against ceiled totals.
pub fn ceil_hours(minutes: u32) -> u32 {
    minutes.div_ceil(60)
}

/// Teaching days. The institution never schedules weekend meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

/// Half-open weekly slot `[start, end)` on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub weekday: Weekday,
    pub start: Minutes,
    pub end: Minutes,
}

impl TimeInterval {
    pub fn new(weekday: Weekday, start: Minutes, end: Minutes) -> Self {
        debug_assert!(start < end, "interval start must be before end");
        Self { weekday, start, end }
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end - self.start)
    }

    /// Same weekday and a shared stretch of time. Half-open, so intervals
    /// that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.weekday == other.weekday && self.start < other.end && other.start < self.end
    }
}

/// One weekly recurring time slot for a section. Identity is immutable,
/// the interval may be rescheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Ulid,
    pub section_id: Ulid,
    pub interval: TimeInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseType {
    Core,
    Elective,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Ulid,
    pub code: String,
    pub name: String,
    pub hours_per_week: u32,
    pub course_type: CourseType,
    pub grade_level_min: u8,
    pub grade_level_max: u8,
    /// Position within the academic year (1 or 2).
    pub semester_order: u8,
    /// Single-hop requirement chain: at most one direct prerequisite,
    /// referenced by id rather than held as a nested object.
    pub prerequisite_id: Option<Ulid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: Ulid,
    pub name: String,
    pub max_daily_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: Ulid,
    pub name: String,
    pub grade_level: u8,
}

/// A specific offering of a course. `enrollment_count` and `version` are
/// mutated only through the registry's conditioned write: the version is the
/// optimistic concurrency token and moves by exactly one per accepted write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: Ulid,
    pub course_id: Ulid,
    pub teacher_id: Ulid,
    pub classroom_id: Ulid,
    pub semester_id: Ulid,
    pub capacity: u32,
    pub enrollment_count: u32,
    pub version: u64,
}

impl Section {
    pub fn new(
        id: Ulid,
        course_id: Ulid,
        teacher_id: Ulid,
        classroom_id: Ulid,
        semester_id: Ulid,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            course_id,
            teacher_id,
            classroom_id,
            semester_id,
            capacity,
            enrollment_count: 0,
            version: 0,
        }
    }

    pub fn has_seat(&self) -> bool {
        self.enrollment_count < self.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Enrolled,
    Withdrawn,
}

/// Links a student to a section for one semester. Unique per
/// (student, section, semester).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Ulid,
    pub student_id: Ulid,
    pub section_id: Ulid,
    pub semester_id: Ulid,
    pub status: EnrollmentStatus,
    pub grade: Option<f32>,
}

impl Enrollment {
    pub fn new(student_id: Ulid, section_id: Ulid, semester_id: Ulid) -> Self {
        Self {
            id: Ulid::new(),
            student_id,
            section_id,
            semester_id,
            status: EnrollmentStatus::Enrolled,
            grade: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryStatus {
    Passed,
    Failed,
}

/// Past outcome of a (student, course, semester). Read-only to the engine;
/// feeds the prerequisite and retake rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub student_id: Ulid,
    pub course_id: Ulid,
    pub semester_id: Ulid,
    pub status: HistoryStatus,
}

/// Render minutes-since-midnight as `HH:MM` for error messages.
pub(crate) fn fmt_hm(m: Minutes) -> String {
    format!("{:02}:{:02}", m / 60, m % 60)
}
