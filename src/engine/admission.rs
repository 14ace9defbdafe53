//! Capacity controller: concurrency-safe admission to a capacity-bounded
//! section. Optimistic versioning with a bounded, explicit retry loop — no
//! lock is held across the rule chain; losers of a race re-read and retry
//! instead of blocking.

use std::time::Instant;

use ulid::Ulid;

use crate::limits::MAX_ADMISSION_ATTEMPTS;
use crate::model::{Enrollment, EnrollmentStatus};
use crate::observability;

use super::error::{AdmissionError, EnrollmentError};
use super::rules::EnrollmentContext;
use super::Engine;

impl Engine {
    /// Admit a student into a section. Each attempt re-reads the section
    /// fresh, re-runs the whole rule chain against that snapshot, persists
    /// the enrollment, then commits `enrollment_count + 1` conditioned on
    /// the version observed at read time. A version mismatch means another
    /// admission landed first: the attempt's enrollment write is discarded
    /// and the sequence restarts, up to [`MAX_ADMISSION_ATTEMPTS`] rounds.
    ///
    /// `enrollment_count` can never overshoot `capacity`: the count only
    /// moves through the conditioned write, and the seat check ran against
    /// the same version that write is conditioned on.
    pub async fn admit_enrollment(
        &self,
        student_id: Ulid,
        section_id: Ulid,
    ) -> Result<Enrollment, AdmissionError> {
        let started = Instant::now();

        for attempt in 1..=MAX_ADMISSION_ATTEMPTS {
            let (student, section, course) =
                self.enrollment_snapshot(student_id, section_id).await?;

            let chain = self
                .run_rule_chain(&EnrollmentContext {
                    student: &student,
                    section: &section,
                    course: &course,
                })
                .await;
            if let Err(e) = chain {
                metrics::counter!(
                    observability::ADMISSIONS_TOTAL,
                    "outcome" => "rejected"
                )
                .increment(1);
                metrics::counter!(
                    observability::ENROLLMENT_REJECTIONS_TOTAL,
                    "rule" => observability::enrollment_rejection_label(&e)
                )
                .increment(1);
                tracing::debug!(%student_id, %section_id, attempt, error = %e, "admission rejected");
                return Err(AdmissionError::Rejected(e));
            }

            let enrollment = Enrollment::new(student_id, section_id, section.semester_id);
            self.ledger.insert(enrollment.clone()).await;

            let mut admitted = section.clone();
            admitted.enrollment_count += 1;
            if self
                .registry
                .store_section_if_version(admitted, section.version)
                .await
            {
                metrics::counter!(
                    observability::ADMISSIONS_TOTAL,
                    "outcome" => "admitted"
                )
                .increment(1);
                metrics::histogram!(observability::ADMISSION_DURATION_SECONDS)
                    .record(started.elapsed().as_secs_f64());
                return Ok(enrollment);
            }

            // Lost the race: another admission bumped the version between
            // our read and our write. Roll back this attempt's record.
            self.ledger.remove(enrollment.id).await;
            metrics::counter!(observability::ADMISSION_RETRIES_TOTAL).increment(1);
            tracing::debug!(%student_id, %section_id, attempt, "section version moved, retrying");
        }

        metrics::counter!(
            observability::ADMISSIONS_TOTAL,
            "outcome" => "contention"
        )
        .increment(1);
        Err(AdmissionError::ContentionExhausted { attempts: MAX_ADMISSION_ATTEMPTS })
    }

    /// Withdraw an enrollment and free its seat. The ENROLLED -> WITHDRAWN
    /// transition is a conditioned flip: whichever caller performs it owns
    /// the decrement, so concurrent withdrawals of the same record free one
    /// seat, not two. The count then moves through the same bounded CAS
    /// loop as admission; if every round loses, the flip is reverted so the
    /// record stays withdrawable and the seat is not stranded. No rule
    /// re-validation: freeing capacity cannot violate any invariant.
    pub async fn withdraw_enrollment(&self, enrollment_id: Ulid) -> Result<(), AdmissionError> {
        let enrollment = self
            .ledger
            .get(enrollment_id)
            .await
            .ok_or(AdmissionError::EnrollmentNotFound(enrollment_id))?;
        let flipped = self
            .ledger
            .set_status_if(
                enrollment_id,
                EnrollmentStatus::Enrolled,
                EnrollmentStatus::Withdrawn,
            )
            .await;
        if !flipped {
            // Already withdrawn (possibly by a concurrent caller that now
            // owns the decrement); nothing to free here.
            return Ok(());
        }

        for attempt in 1..=MAX_ADMISSION_ATTEMPTS {
            let Some(section) = self.registry.section(enrollment.section_id).await else {
                self.ledger
                    .set_status_if(
                        enrollment_id,
                        EnrollmentStatus::Withdrawn,
                        EnrollmentStatus::Enrolled,
                    )
                    .await;
                return Err(AdmissionError::Rejected(EnrollmentError::SectionNotFound(
                    enrollment.section_id,
                )));
            };
            let mut released = section.clone();
            released.enrollment_count = section.enrollment_count.saturating_sub(1);
            if self
                .registry
                .store_section_if_version(released, section.version)
                .await
            {
                return Ok(());
            }
            metrics::counter!(observability::ADMISSION_RETRIES_TOTAL).increment(1);
            tracing::debug!(%enrollment_id, attempt, "section version moved, retrying decrement");
        }

        // The seat was not freed. Hand the transition back so a later
        // withdrawal can run the decrement again.
        self.ledger
            .set_status_if(
                enrollment_id,
                EnrollmentStatus::Withdrawn,
                EnrollmentStatus::Enrolled,
            )
            .await;
        Err(AdmissionError::ContentionExhausted { attempts: MAX_ADMISSION_ATTEMPTS })
    }
}
