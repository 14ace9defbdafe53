//! The enrollment rule chain: seven ordered, fail-fast business rules for
//! one enrollment attempt. A plain list of rule functions over an explicit
//! context — nothing here mutates state.

use crate::limits::MAX_COURSES_PER_SEMESTER;
use crate::model::{Course, Section, Student};

use super::Engine;
use super::error::EnrollmentError;

pub(crate) struct EnrollmentContext<'a> {
    pub student: &'a Student,
    pub section: &'a Section,
    pub course: &'a Course,
}

impl Engine {
    /// Run the full chain in order. The first violated rule wins; later
    /// rules are not evaluated.
    pub(crate) async fn run_rule_chain(
        &self,
        ctx: &EnrollmentContext<'_>,
    ) -> Result<(), EnrollmentError> {
        self.no_duplicate_course(ctx).await?;
        self.not_already_completed(ctx).await?;
        grade_level_eligible(ctx)?;
        seat_available(ctx)?;
        self.course_load_within_limit(ctx).await?;
        self.prerequisite_satisfied(ctx).await?;
        self.no_schedule_overlap(ctx).await?;
        Ok(())
    }

    /// Rule 1: not already enrolled in this course (any section) this semester.
    async fn no_duplicate_course(&self, ctx: &EnrollmentContext<'_>) -> Result<(), EnrollmentError> {
        let duplicate = self
            .ledger
            .is_enrolled_in_course(ctx.student.id, ctx.course.id, ctx.section.semester_id)
            .await;
        if duplicate {
            return Err(EnrollmentError::DuplicateCourse { course_id: ctx.course.id });
        }
        Ok(())
    }

    /// Rule 2: passed courses cannot be retaken. Independent of rule 1: a
    /// FAILED history record does not block another attempt.
    async fn not_already_completed(
        &self,
        ctx: &EnrollmentContext<'_>,
    ) -> Result<(), EnrollmentError> {
        if self.history.has_passed(ctx.student.id, ctx.course.id).await {
            return Err(EnrollmentError::AlreadyCompleted { course_id: ctx.course.id });
        }
        Ok(())
    }

    /// Rule 5: active enrollments this semester must stay under the load cap.
    async fn course_load_within_limit(
        &self,
        ctx: &EnrollmentContext<'_>,
    ) -> Result<(), EnrollmentError> {
        let active = self
            .ledger
            .active_count(ctx.student.id, ctx.section.semester_id)
            .await;
        if active >= MAX_COURSES_PER_SEMESTER {
            return Err(EnrollmentError::CourseLoadExceeded { limit: MAX_COURSES_PER_SEMESTER });
        }
        Ok(())
    }

    /// Rule 6: a declared prerequisite must be passed, and its place in the
    /// academic year must not come after the course that requires it. The
    /// chain is single-hop: only the directly declared prerequisite is
    /// checked, transitive requirements were checked when it was taken.
    async fn prerequisite_satisfied(
        &self,
        ctx: &EnrollmentContext<'_>,
    ) -> Result<(), EnrollmentError> {
        let Some(prerequisite_id) = ctx.course.prerequisite_id else {
            return Ok(());
        };
        if !self.history.has_passed(ctx.student.id, prerequisite_id).await {
            return Err(EnrollmentError::PrerequisiteNotMet { prerequisite_id });
        }
        let prerequisite = self
            .registry
            .course(prerequisite_id)
            .await
            .ok_or(EnrollmentError::CourseNotFound(prerequisite_id))?;
        if prerequisite.semester_order > ctx.course.semester_order {
            return Err(EnrollmentError::PrerequisiteMisordered {
                prerequisite_id,
                prerequisite_order: prerequisite.semester_order,
                course_order: ctx.course.semester_order,
            });
        }
        Ok(())
    }

    /// Rule 7: all-pairs interval comparison between the candidate section's
    /// meetings and the meetings of every section the student is already
    /// enrolled in this semester. Vacuously passes for a section with no
    /// meetings scheduled yet.
    async fn no_schedule_overlap(&self, ctx: &EnrollmentContext<'_>) -> Result<(), EnrollmentError> {
        let candidate_meetings = self.meetings.for_section(ctx.section.id).await;
        if candidate_meetings.is_empty() {
            return Ok(());
        }
        let enrolled = self
            .ledger
            .active_for_student(ctx.student.id, ctx.section.semester_id)
            .await;
        for enrollment in enrolled {
            let existing = self.meetings.for_section(enrollment.section_id).await;
            let collides = candidate_meetings
                .iter()
                .any(|c| existing.iter().any(|e| c.interval.overlaps(&e.interval)));
            if collides {
                return Err(EnrollmentError::ScheduleOverlap {
                    enrolled_section_id: enrollment.section_id,
                });
            }
        }
        Ok(())
    }
}

/// Rule 3: the student's grade level must fall in the course's range.
fn grade_level_eligible(ctx: &EnrollmentContext<'_>) -> Result<(), EnrollmentError> {
    let grade = ctx.student.grade_level;
    if grade < ctx.course.grade_level_min || grade > ctx.course.grade_level_max {
        return Err(EnrollmentError::GradeLevel {
            grade_level: grade,
            min: ctx.course.grade_level_min,
            max: ctx.course.grade_level_max,
        });
    }
    Ok(())
}

/// Rule 4: advisory seat check against the snapshot. Authoritative
/// enforcement happens in the admission loop's conditioned write.
fn seat_available(ctx: &EnrollmentContext<'_>) -> Result<(), EnrollmentError> {
    if !ctx.section.has_seat() {
        return Err(EnrollmentError::SectionFull { capacity: ctx.section.capacity });
    }
    Ok(())
}
