use ulid::Ulid;

use crate::model::{CourseType, Minutes, TimeInterval, Weekday, fmt_hm};

/// How a failure should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Client-correctable rule violation.
    Validation,
    /// Contention on a scheduled resource (teacher, room, seat, timetable).
    Conflict,
    /// Optimistic retries exhausted; the whole operation may be retried.
    Transient,
}

/// Rejection of one proposed weekly meeting slot. Variants carry the
/// offending value and the limit so a client can self-correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeetingConflictError {
    SectionNotFound(Ulid),
    CourseNotFound(Ulid),
    TeacherNotFound(Ulid),
    DuplicateSlot {
        weekday: Weekday,
        start: Minutes,
    },
    EmptyWindow {
        start: Minutes,
        end: Minutes,
    },
    LunchOverlap {
        interval: TimeInterval,
    },
    HoursOutOfRange {
        course_type: CourseType,
        hours_per_week: u32,
        min: u32,
        max: u32,
    },
    WeeklyHoursExceeded {
        total_hours: u32,
        limit: u32,
    },
    TeacherBusy {
        teacher_id: Ulid,
        conflicting: Ulid,
    },
    ClassroomBusy {
        classroom_id: Ulid,
        conflicting: Ulid,
    },
    DailyHoursExceeded {
        teacher_id: Ulid,
        weekday: Weekday,
        total_hours: u32,
        limit: u32,
    },
}

impl MeetingConflictError {
    pub fn class(&self) -> FailureClass {
        match self {
            MeetingConflictError::TeacherBusy { .. }
            | MeetingConflictError::ClassroomBusy { .. } => FailureClass::Conflict,
            _ => FailureClass::Validation,
        }
    }
}

impl std::fmt::Display for MeetingConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetingConflictError::SectionNotFound(id) => write!(f, "section not found: {id}"),
            MeetingConflictError::CourseNotFound(id) => write!(f, "course not found: {id}"),
            MeetingConflictError::TeacherNotFound(id) => write!(f, "teacher not found: {id}"),
            MeetingConflictError::DuplicateSlot { weekday, start } => {
                write!(f, "section already meets on {weekday:?} at {}", fmt_hm(*start))
            }
            MeetingConflictError::EmptyWindow { start, end } => {
                write!(f, "start {} must be before end {}", fmt_hm(*start), fmt_hm(*end))
            }
            MeetingConflictError::LunchOverlap { interval } => write!(
                f,
                "meeting {}-{} overlaps the protected lunch window 12:00-13:00",
                fmt_hm(interval.start),
                fmt_hm(interval.end)
            ),
            MeetingConflictError::HoursOutOfRange { course_type, hours_per_week, min, max } => {
                write!(
                    f,
                    "{course_type:?} courses require {min}-{max} hours/week, course declares {hours_per_week}"
                )
            }
            MeetingConflictError::WeeklyHoursExceeded { total_hours, limit } => write!(
                f,
                "scheduled meetings would total {total_hours}h, course allows {limit}h/week"
            ),
            MeetingConflictError::TeacherBusy { teacher_id, conflicting } => {
                write!(f, "teacher {teacher_id} already teaches meeting {conflicting} at this time")
            }
            MeetingConflictError::ClassroomBusy { classroom_id, conflicting } => {
                write!(f, "classroom {classroom_id} already hosts meeting {conflicting} at this time")
            }
            MeetingConflictError::DailyHoursExceeded { teacher_id, weekday, total_hours, limit } => {
                write!(
                    f,
                    "teacher {teacher_id} would teach {total_hours}h on {weekday:?}, cap is {limit}h"
                )
            }
        }
    }
}

impl std::error::Error for MeetingConflictError {}

/// Rejection of one enrollment attempt by the rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    StudentNotFound(Ulid),
    SectionNotFound(Ulid),
    CourseNotFound(Ulid),
    DuplicateCourse {
        course_id: Ulid,
    },
    AlreadyCompleted {
        course_id: Ulid,
    },
    GradeLevel {
        grade_level: u8,
        min: u8,
        max: u8,
    },
    SectionFull {
        capacity: u32,
    },
    CourseLoadExceeded {
        limit: usize,
    },
    PrerequisiteNotMet {
        prerequisite_id: Ulid,
    },
    /// Data-integrity error: the prerequisite is scheduled for a later term
    /// in the academic year than the course that requires it.
    PrerequisiteMisordered {
        prerequisite_id: Ulid,
        prerequisite_order: u8,
        course_order: u8,
    },
    ScheduleOverlap {
        enrolled_section_id: Ulid,
    },
}

impl EnrollmentError {
    pub fn class(&self) -> FailureClass {
        match self {
            EnrollmentError::SectionFull { .. } | EnrollmentError::ScheduleOverlap { .. } => {
                FailureClass::Conflict
            }
            _ => FailureClass::Validation,
        }
    }
}

impl std::fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentError::StudentNotFound(id) => write!(f, "student not found: {id}"),
            EnrollmentError::SectionNotFound(id) => write!(f, "section not found: {id}"),
            EnrollmentError::CourseNotFound(id) => write!(f, "course not found: {id}"),
            EnrollmentError::DuplicateCourse { course_id } => {
                write!(f, "already enrolled in course {course_id} this semester")
            }
            EnrollmentError::AlreadyCompleted { course_id } => {
                write!(f, "course {course_id} already passed; passed courses cannot be retaken")
            }
            EnrollmentError::GradeLevel { grade_level, min, max } => {
                write!(f, "grade level {grade_level} outside the course range {min}-{max}")
            }
            EnrollmentError::SectionFull { capacity } => {
                write!(f, "section is at capacity ({capacity} students)")
            }
            EnrollmentError::CourseLoadExceeded { limit } => {
                write!(f, "course load limit reached ({limit} per semester)")
            }
            EnrollmentError::PrerequisiteNotMet { prerequisite_id } => {
                write!(f, "prerequisite {prerequisite_id} not passed")
            }
            EnrollmentError::PrerequisiteMisordered {
                prerequisite_id,
                prerequisite_order,
                course_order,
            } => write!(
                f,
                "prerequisite {prerequisite_id} sits in semester {prerequisite_order}, after the course's semester {course_order}"
            ),
            EnrollmentError::ScheduleOverlap { enrolled_section_id } => {
                write!(f, "meets at the same time as enrolled section {enrolled_section_id}")
            }
        }
    }
}

impl std::error::Error for EnrollmentError {}

/// Terminal outcome of the admission loop (rule chain + capacity CAS) and of
/// withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    Rejected(EnrollmentError),
    /// The conditioned write lost every round to concurrent admissions.
    /// Transient contention, not a hard capacity violation — retryable.
    ContentionExhausted { attempts: u32 },
    EnrollmentNotFound(Ulid),
}

impl AdmissionError {
    pub fn class(&self) -> FailureClass {
        match self {
            AdmissionError::Rejected(e) => e.class(),
            AdmissionError::ContentionExhausted { .. } => FailureClass::Transient,
            AdmissionError::EnrollmentNotFound(_) => FailureClass::Validation,
        }
    }
}

impl From<EnrollmentError> for AdmissionError {
    fn from(e: EnrollmentError) -> Self {
        AdmissionError::Rejected(e)
    }
}

impl std::fmt::Display for AdmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmissionError::Rejected(e) => write!(f, "enrollment rejected: {e}"),
            AdmissionError::ContentionExhausted { attempts } => {
                write!(f, "section version moved on all {attempts} admission attempts")
            }
            AdmissionError::EnrollmentNotFound(id) => write!(f, "enrollment not found: {id}"),
        }
    }
}

impl std::error::Error for AdmissionError {}
