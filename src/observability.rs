use std::net::SocketAddr;

use crate::engine::{EnrollmentError, MeetingConflictError};

// ── Admission pipeline ──────────────────────────────────────────

/// Counter: terminal admission outcomes. Labels: outcome
/// (admitted | rejected | contention).
pub const ADMISSIONS_TOTAL: &str = "rollbook_admissions_total";

/// Counter: conditioned writes that lost their version race and retried.
pub const ADMISSION_RETRIES_TOTAL: &str = "rollbook_admission_retries_total";

/// Histogram: wall time of a successful admission, retries included.
pub const ADMISSION_DURATION_SECONDS: &str = "rollbook_admission_duration_seconds";

// ── Validators ──────────────────────────────────────────────────

/// Counter: meeting candidates rejected. Labels: rule.
pub const MEETING_REJECTIONS_TOTAL: &str = "rollbook_meeting_rejections_total";

/// Counter: enrollment attempts rejected by the rule chain. Labels: rule.
pub const ENROLLMENT_REJECTIONS_TOTAL: &str = "rollbook_enrollment_rejections_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a meeting rejection to a short label for metrics.
pub fn meeting_rejection_label(e: &MeetingConflictError) -> &'static str {
    match e {
        MeetingConflictError::SectionNotFound(_)
        | MeetingConflictError::CourseNotFound(_)
        | MeetingConflictError::TeacherNotFound(_) => "not_found",
        MeetingConflictError::DuplicateSlot { .. } => "duplicate_slot",
        MeetingConflictError::EmptyWindow { .. } => "empty_window",
        MeetingConflictError::LunchOverlap { .. } => "lunch_overlap",
        MeetingConflictError::HoursOutOfRange { .. } => "hours_out_of_range",
        MeetingConflictError::WeeklyHoursExceeded { .. } => "weekly_hours_exceeded",
        MeetingConflictError::TeacherBusy { .. } => "teacher_busy",
        MeetingConflictError::ClassroomBusy { .. } => "classroom_busy",
        MeetingConflictError::DailyHoursExceeded { .. } => "daily_hours_exceeded",
    }
}

/// Map an enrollment rejection to a short label for metrics.
pub fn enrollment_rejection_label(e: &EnrollmentError) -> &'static str {
    match e {
        EnrollmentError::StudentNotFound(_)
        | EnrollmentError::SectionNotFound(_)
        | EnrollmentError::CourseNotFound(_) => "not_found",
        EnrollmentError::DuplicateCourse { .. } => "duplicate_course",
        EnrollmentError::AlreadyCompleted { .. } => "already_completed",
        EnrollmentError::GradeLevel { .. } => "grade_level",
        EnrollmentError::SectionFull { .. } => "section_full",
        EnrollmentError::CourseLoadExceeded { .. } => "course_load",
        EnrollmentError::PrerequisiteNotMet { .. } => "prerequisite_not_met",
        EnrollmentError::PrerequisiteMisordered { .. } => "prerequisite_misordered",
        EnrollmentError::ScheduleOverlap { .. } => "schedule_overlap",
    }
}
