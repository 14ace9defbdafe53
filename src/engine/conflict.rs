//! Ordered checks for one proposed weekly meeting slot. Pure over the
//! snapshots the engine hands in; fail-fast on the first violated rule.
//! Every check excludes a persisted meeting carrying the candidate's own id,
//! which makes update re-validation work without a separate code path.

use crate::limits::*;
use crate::model::*;

use super::error::MeetingConflictError;

pub(crate) struct MeetingContext<'a> {
    pub section: &'a Section,
    pub course: &'a Course,
    pub teacher: &'a Teacher,
    /// Persisted meetings of the candidate's section.
    pub section_meetings: &'a [Meeting],
    /// Persisted meetings of every section taught by the section's teacher.
    pub teacher_meetings: &'a [Meeting],
    /// Persisted meetings of every section held in the section's classroom.
    pub classroom_meetings: &'a [Meeting],
}

pub(crate) fn validate_meeting(
    candidate: &Meeting,
    ctx: &MeetingContext<'_>,
) -> Result<(), MeetingConflictError> {
    check_unique_slot(candidate, ctx.section_meetings)?;
    check_time_window(candidate)?;
    check_lunch_window(candidate)?;
    check_course_hours_range(ctx.course)?;
    check_weekly_hours(candidate, ctx.course, ctx.section_meetings)?;
    check_double_booking(candidate, ctx)?;
    check_daily_hours(candidate, ctx.teacher, ctx.teacher_meetings)?;
    Ok(())
}

/// Rule 1: no second meeting of the same section on the same weekday with
/// the same start time.
fn check_unique_slot(candidate: &Meeting, existing: &[Meeting]) -> Result<(), MeetingConflictError> {
    let duplicate = existing.iter().any(|m| {
        m.id != candidate.id
            && m.interval.weekday == candidate.interval.weekday
            && m.interval.start == candidate.interval.start
    });
    if duplicate {
        return Err(MeetingConflictError::DuplicateSlot {
            weekday: candidate.interval.weekday,
            start: candidate.interval.start,
        });
    }
    Ok(())
}

/// Rule 2: the window must be non-empty.
fn check_time_window(candidate: &Meeting) -> Result<(), MeetingConflictError> {
    let TimeInterval { start, end, .. } = candidate.interval;
    if start >= end {
        return Err(MeetingConflictError::EmptyWindow { start, end });
    }
    Ok(())
}

/// Rule 3: the protected lunch window is off-limits on every weekday.
/// Touching 12:00 or 13:00 exactly is allowed (half-open comparison).
fn check_lunch_window(candidate: &Meeting) -> Result<(), MeetingConflictError> {
    let TimeInterval { start, end, .. } = candidate.interval;
    if start < LUNCH_END && end > LUNCH_START {
        return Err(MeetingConflictError::LunchOverlap { interval: candidate.interval });
    }
    Ok(())
}

/// Rule 4: the course's declared weekly hours must sit in the range for its
/// type. Re-checked on every add since course data may have been edited.
fn check_course_hours_range(course: &Course) -> Result<(), MeetingConflictError> {
    let (min, max) = match course.course_type {
        CourseType::Core => (CORE_HOURS_MIN, CORE_HOURS_MAX),
        CourseType::Elective => (ELECTIVE_HOURS_MIN, ELECTIVE_HOURS_MAX),
    };
    if course.hours_per_week < min || course.hours_per_week > max {
        return Err(MeetingConflictError::HoursOutOfRange {
            course_type: course.course_type,
            hours_per_week: course.hours_per_week,
            min,
            max,
        });
    }
    Ok(())
}

/// Rule 5: existing section meetings plus the candidate, summed in minutes
/// and ceiled to whole hours, must fit the course's weekly budget.
fn check_weekly_hours(
    candidate: &Meeting,
    course: &Course,
    existing: &[Meeting],
) -> Result<(), MeetingConflictError> {
    let scheduled: u32 = existing
        .iter()
        .filter(|m| m.id != candidate.id)
        .map(|m| m.interval.duration_minutes())
        .sum();
    let total_hours = ceil_hours(scheduled + candidate.interval.duration_minutes());
    if total_hours > course.hours_per_week {
        return Err(MeetingConflictError::WeeklyHoursExceeded {
            total_hours,
            limit: course.hours_per_week,
        });
    }
    Ok(())
}

/// Rule 6: the teacher and the classroom must both be free for the whole
/// candidate window.
fn check_double_booking(
    candidate: &Meeting,
    ctx: &MeetingContext<'_>,
) -> Result<(), MeetingConflictError> {
    if let Some(hit) = first_overlap(candidate, ctx.teacher_meetings) {
        return Err(MeetingConflictError::TeacherBusy {
            teacher_id: ctx.section.teacher_id,
            conflicting: hit,
        });
    }
    if let Some(hit) = first_overlap(candidate, ctx.classroom_meetings) {
        return Err(MeetingConflictError::ClassroomBusy {
            classroom_id: ctx.section.classroom_id,
            conflicting: hit,
        });
    }
    Ok(())
}

fn first_overlap(candidate: &Meeting, others: &[Meeting]) -> Option<ulid::Ulid> {
    others
        .iter()
        .find(|m| m.id != candidate.id && m.interval.overlaps(&candidate.interval))
        .map(|m| m.id)
}

/// Rule 7: the teacher's meetings on the candidate's weekday, candidate
/// included, must fit the daily hour cap after ceiling.
fn check_daily_hours(
    candidate: &Meeting,
    teacher: &Teacher,
    teacher_meetings: &[Meeting],
) -> Result<(), MeetingConflictError> {
    let scheduled: u32 = teacher_meetings
        .iter()
        .filter(|m| m.id != candidate.id && m.interval.weekday == candidate.interval.weekday)
        .map(|m| m.interval.duration_minutes())
        .sum();
    let total_hours = ceil_hours(scheduled + candidate.interval.duration_minutes());
    if total_hours > teacher.max_daily_hours {
        return Err(MeetingConflictError::DailyHoursExceeded {
            teacher_id: teacher.id,
            weekday: candidate.interval.weekday,
            total_hours,
            limit: teacher.max_daily_hours,
        });
    }
    Ok(())
}
