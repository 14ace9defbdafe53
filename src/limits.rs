//! Institutional limits. These are policy constants, not tunables.

use crate::model::Minutes;

/// Protected lunch window start (12:00). No meeting may overlap it.
pub const LUNCH_START: Minutes = 12 * 60;

/// Protected lunch window end (13:00). Touching the boundary is allowed.
pub const LUNCH_END: Minutes = 13 * 60;

/// Weekly hour range for core courses.
pub const CORE_HOURS_MIN: u32 = 4;
pub const CORE_HOURS_MAX: u32 = 6;

/// Weekly hour range for elective courses.
pub const ELECTIVE_HOURS_MIN: u32 = 2;
pub const ELECTIVE_HOURS_MAX: u32 = 4;

/// A student may hold at most this many active enrollments per semester.
pub const MAX_COURSES_PER_SEMESTER: usize = 5;

/// Upper bound on section capacity, enforced at registration.
pub const MAX_SECTION_CAPACITY: u32 = 10;

/// Admission rounds before a version-contended enrollment gives up.
pub const MAX_ADMISSION_ATTEMPTS: u32 = 3;
